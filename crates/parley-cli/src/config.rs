use anyhow::Context;
use parley_agent::{LlmProvider, ModelConfig, PipelineConfig};
use parley_gateway::StreamConfig;
use serde::Deserialize;
use std::path::Path;

/// Contents of `parley.toml`. Every section is optional.
#[derive(Debug, Deserialize)]
pub struct ParleyConfig {
    #[serde(default = "default_model")]
    pub model: ModelConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_model() -> ModelConfig {
    ModelConfig {
        think: Some(false),
        ..ModelConfig::new(LlmProvider::Ollama, "qwen3:0.6b")
    }
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            server: ServerConfig::default(),
            pipeline: PipelineConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl ParleyConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read the config at `path`. A missing file is only an error when
    /// `required` is set; otherwise the defaults apply.
    pub fn load(path: &Path, required: bool) -> anyhow::Result<Self> {
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Apply `PARLEY_API_KEY` (only when no key is configured) and `PORT`.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.model.api_key.is_empty() {
            if let Some(key) = lookup("PARLEY_API_KEY") {
                self.model.api_key = key;
            }
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: '{port}'"))?;
        }
        Ok(())
    }
}
