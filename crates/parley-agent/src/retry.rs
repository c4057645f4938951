use crate::backends::LlmBackend;
use crate::llm::ModelResponse;
use async_trait::async_trait;
use parley_core::{Message, ParleyError, ParleyResult};
use parley_skills::SkillDescriptor;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Configures bounded retries of model calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub backoff_base_ms: u64,
    /// Maximum delay in milliseconds (cap for exponential backoff).
    pub backoff_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 500,
            backoff_max_ms: 30_000,
        }
    }
}

/// Whether an error is a transport failure worth retrying.
///
/// Only network errors (which include 429 and 5xx answers) and deadline
/// expiry qualify. A malformed or rejected response will not improve on
/// retry.
pub fn is_retryable(err: &ParleyError) -> bool {
    matches!(err, ParleyError::Http(_) | ParleyError::Timeout(_))
}

/// Computes the backoff delay for a given attempt using exponential backoff
/// capped at `backoff_max_ms`.
fn compute_backoff(policy: &RetryPolicy, attempt: u32) -> u64 {
    let delay = policy
        .backoff_base_ms
        .saturating_mul(2u64.saturating_pow(attempt));
    delay.min(policy.backoff_max_ms)
}

/// An [`LlmBackend`] that wraps another one with a per-attempt deadline and
/// exponential-backoff retries for transient failures.
pub struct RetryingBackend {
    inner: Box<dyn LlmBackend>,
    policy: RetryPolicy,
    deadline: Option<Duration>,
}

impl RetryingBackend {
    pub fn new(inner: Box<dyn LlmBackend>, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            deadline: None,
        }
    }

    /// Bound every attempt by `deadline`; `None` means no bound.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    async fn attempt(
        &self,
        messages: &[Message],
        tools: &[SkillDescriptor],
    ) -> ParleyResult<ModelResponse> {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, self.inner.chat(messages, tools))
                .await
                .unwrap_or_else(|_| {
                    Err(ParleyError::Timeout(format!(
                        "no model response within {}ms",
                        limit.as_millis()
                    )))
                }),
            None => self.inner.chat(messages, tools).await,
        }
    }
}

#[async_trait]
impl LlmBackend for RetryingBackend {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[SkillDescriptor],
    ) -> ParleyResult<ModelResponse> {
        let mut last_err: Option<ParleyError> = None;

        for attempt in 0..=self.policy.max_retries {
            match self.attempt(messages, tools).await {
                Ok(resp) => return Ok(resp),
                Err(e) if !is_retryable(&e) => {
                    warn!(attempt, error = %e, "Non-retryable model error");
                    return Err(e);
                }
                Err(e) => {
                    if attempt < self.policy.max_retries {
                        let delay = compute_backoff(&self.policy, attempt);
                        info!(attempt, delay_ms = delay, error = %e, "Retryable model error, backing off");
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ParleyError::Http("model retries exhausted".into())))
    }
}
