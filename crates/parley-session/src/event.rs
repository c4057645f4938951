use parley_core::ParleyResult;
use serde::{Deserialize, Serialize};

/// An event delivered to a streaming client.
///
/// Serialized as a JSON envelope tagged by `type`, e.g.
/// `{"type":"token","content":"Hello"}` or `{"type":"done"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseEvent {
    /// The serialized output of one tool call.
    Tool { content: String },

    /// A chunk of the final answer.
    Token { content: String },

    /// The turn finished; nothing follows.
    Done,
}

impl SseEvent {
    pub fn tool(content: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
        }
    }

    pub fn token(content: impl Into<String>) -> Self {
        Self::Token {
            content: content.into(),
        }
    }

    /// `Done` ends a session's event sequence, on success and failure alike.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The JSON envelope written into an SSE `data:` line.
    pub fn to_payload(&self) -> ParleyResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelopes() {
        assert_eq!(
            SseEvent::tool("42").to_payload().unwrap(),
            r#"{"type":"tool","content":"42"}"#
        );
        assert_eq!(
            SseEvent::token("Hel").to_payload().unwrap(),
            r#"{"type":"token","content":"Hel"}"#
        );
        assert_eq!(SseEvent::Done.to_payload().unwrap(), r#"{"type":"done"}"#);
    }

    #[test]
    fn test_terminal_classification() {
        assert!(SseEvent::Done.is_terminal());
        assert!(!SseEvent::token("x").is_terminal());
        assert!(!SseEvent::tool("x").is_terminal());
    }

    #[test]
    fn test_parse_envelope() {
        let event: SseEvent = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert_eq!(event, SseEvent::Done);

        assert!(serde_json::from_str::<SseEvent>(r#"{"type":"error","message":"x"}"#).is_err());
    }
}
