use crate::backends::openai::OpenAiBackend;
use crate::backends::LlmBackend;
use crate::config::ModelConfig;
use crate::retry::{RetryPolicy, RetryingBackend};
use parley_core::{Message, ParleyError, ParleyResult, ToolCall};
use parley_skills::SkillDescriptor;
use tracing::{debug, error};

/// What the model returned for one request: free text, tool calls, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub text: String,
    /// In the order the model listed them.
    pub tool_calls: Vec<ToolCall>,
}

impl ModelResponse {
    /// A plain text answer with no tool calls.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A response asking for `calls`, with no text.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            text: String::new(),
            tool_calls: calls,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Model client used by the turn pipeline.
///
/// Stateless between calls. Every failure that survives the retry layer is
/// reported as [`ParleyError::ModelUnavailable`].
pub struct ModelGateway {
    backend: Box<dyn LlmBackend>,
}

impl ModelGateway {
    /// Build the OpenAI-compatible backend for `config`, wrapped with its
    /// retry policy and per-attempt deadline.
    pub fn new(config: ModelConfig) -> Self {
        let policy = config.retry_policy.clone();
        let deadline = config.request_timeout();
        let backend = RetryingBackend::new(Box::new(OpenAiBackend::new(config)), policy)
            .with_deadline(deadline);
        Self::from_backend(Box::new(backend))
    }

    /// Create from a pre-built backend, used as is.
    pub fn from_backend(backend: Box<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Create from a pre-built backend, adding retries on transient failures.
    pub fn with_retries(backend: Box<dyn LlmBackend>, policy: RetryPolicy) -> Self {
        Self::from_backend(Box::new(RetryingBackend::new(backend, policy)))
    }

    pub async fn invoke(
        &self,
        messages: &[Message],
        tools: &[SkillDescriptor],
    ) -> ParleyResult<ModelResponse> {
        match self.backend.chat(messages, tools).await {
            Ok(resp) => {
                debug!(
                    text_len = resp.text.len(),
                    tool_calls = resp.tool_calls.len(),
                    "Model responded"
                );
                Ok(resp)
            }
            Err(e) => {
                error!(error = %e, "Model call failed");
                Err(ParleyError::ModelUnavailable(e.to_string()))
            }
        }
    }
}
