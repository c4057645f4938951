use parley_core::{Message, ToolCall, ToolResult};

/// The message list replayed to the model during one turn.
///
/// Always starts with the system prompt and the user's message. A tool round
/// adds the assistant message carrying the calls, then one tool message per
/// call in the order they were requested.
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(user_message)],
        }
    }

    /// Record the model's tool-call request. Providers reject tool messages
    /// that are not preceded by it.
    pub fn push_tool_calls(&mut self, text: impl Into<String>, calls: &[ToolCall]) {
        self.messages
            .push(Message::assistant_tool_calls(text, calls.to_vec()));
    }

    pub fn push_tool_result(&mut self, result: &ToolResult) {
        self.messages
            .push(Message::tool(result.content.clone(), result.call_id.clone()));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Rough token estimation (4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        self.messages.iter().map(|m| m.content.len() / 4).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Role;

    #[test]
    fn test_starts_with_system_then_user() {
        let conv = Conversation::new("be brief", "hello");
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[0].role, Role::System);
        assert_eq!(conv.messages()[1].role, Role::User);
        assert_eq!(conv.messages()[1].content, "hello");
    }

    #[test]
    fn test_tool_results_follow_in_order() {
        let mut conv = Conversation::new("sys", "q");
        conv.push_tool_result(&ToolResult::success("call_1", "a", "first"));
        conv.push_tool_result(&ToolResult::error("call_2", "b", "Error: boom"));

        let tail = &conv.messages()[2..];
        assert_eq!(tail[0].role, Role::Tool);
        assert_eq!(tail[0].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(tail[1].content, "Error: boom");
        assert_eq!(tail[1].tool_call_id.as_deref(), Some("call_2"));
    }

    #[test]
    fn test_tool_calls_precede_their_results() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "a".into(),
            arguments: serde_json::json!({}),
        };
        let mut conv = Conversation::new("sys", "q");
        conv.push_tool_calls("", std::slice::from_ref(&call));
        conv.push_tool_result(&ToolResult::success("call_1", "a", "first"));

        let tail = &conv.messages()[2..];
        assert_eq!(tail[0].role, Role::Assistant);
        assert_eq!(tail[0].tool_calls, vec![call]);
        assert_eq!(tail[1].role, Role::Tool);
    }

    #[test]
    fn test_estimated_tokens() {
        let conv = Conversation::new("a".repeat(40), "b".repeat(40));
        assert_eq!(conv.estimated_tokens(), 20);
    }
}
