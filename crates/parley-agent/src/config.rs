use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which OpenAI-compatible provider serves the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAi,
    OpenRouter,
    /// Groq cloud inference, OpenAI-compatible.
    Groq,
    /// A local Ollama server through its OpenAI-compatible endpoint. No API
    /// key needed.
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub provider: LlmProvider,
    pub model_id: String,
    #[serde(default)]
    pub api_key: String,
    pub api_base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Deadline for a single model call; expiry counts as a transport failure.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub retry_policy: RetryPolicy,
    /// Sent as the request's `think` field when set. Reasoning models such
    /// as qwen3 on Ollama emit their chain of thought into the answer unless
    /// this is `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub think: Option<bool>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl ModelConfig {
    /// A config for `model_id` on `provider` with every other field at its
    /// default.
    pub fn new(provider: LlmProvider, model_id: impl Into<String>) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            api_key: String::new(),
            api_base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            retry_policy: RetryPolicy::default(),
            think: None,
        }
    }

    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url.trim_end_matches('/')
        } else {
            match self.provider {
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
                LlmProvider::Groq => "https://api.groq.com/openai",
                LlmProvider::Ollama => "http://localhost:11434",
            }
        }
    }

    /// `None` when the timeout is configured as zero (no deadline).
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Knobs for one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Characters per streamed token event.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Pause between token events. Cosmetic pacing only.
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
}

fn default_system_prompt() -> String {
    "You are a helpful assistant that can call tools.".to_string()
}

fn default_chunk_size() -> usize {
    16
}

fn default_chunk_delay_ms() -> u64 {
    40
}

impl PipelineConfig {
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
        }
    }
}
