pub mod openai;

use crate::llm::ModelResponse;
use async_trait::async_trait;
use parley_core::{Message, ParleyResult};
use parley_skills::SkillDescriptor;

/// Trait for model provider backends.
///
/// A backend performs exactly one request per call. Retries, deadlines and
/// the mapping to `ModelUnavailable` are layered on top by
/// [`crate::retry::RetryingBackend`] and [`crate::ModelGateway`].
///
/// Backends report failures with the infrastructure error kinds so the retry
/// layer can tell them apart: `Http`/`Timeout` are transient, while
/// `Malformed` and `Rejected` are final.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[SkillDescriptor],
    ) -> ParleyResult<ModelResponse>;
}
