use super::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use crate::llm::ModelResponse;
use async_trait::async_trait;
use parley_core::{Message, ParleyError, ParleyResult, ToolCall};
use parley_skills::SkillDescriptor;
use tracing::debug;

/// OpenAI-compatible chat completions backend.
///
/// Works with OpenAI, OpenRouter, Groq, Ollama, and any other provider
/// that implements the OpenAI chat completions API.
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn build_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|m| {
                let mut entry = serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                });
                if let Some(call_id) = &m.tool_call_id {
                    entry["tool_call_id"] = serde_json::json!(call_id);
                }
                if !m.tool_calls.is_empty() {
                    if m.content.is_empty() {
                        entry["content"] = serde_json::Value::Null;
                    }
                    entry["tool_calls"] = m.tool_calls.iter().map(wire_tool_call).collect();
                }
                entry
            })
            .collect()
    }

    fn build_body(&self, messages: &[Message], tools: &[SkillDescriptor]) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model_id,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": self.build_messages(messages),
        });

        if !tools.is_empty() {
            body["tools"] = serde_json::json!(self.build_tools(tools));
        }
        if let Some(think) = self.config.think {
            body["think"] = serde_json::json!(think);
        }
        body
    }

    fn build_tools(&self, tools: &[SkillDescriptor]) -> Vec<serde_json::Value> {
        tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters_schema,
                    }
                })
            })
            .collect()
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("Content-Type", "application/json");

        let request = if self.config.api_key.is_empty() {
            request
        } else {
            request.header("Authorization", format!("Bearer {}", self.config.api_key))
        };

        // OpenRouter requires extra headers
        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request.header("X-Title", "Parley")
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[SkillDescriptor],
    ) -> ParleyResult<ModelResponse> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        let body = self.build_body(messages, tools);

        debug!(url = %url, messages = messages.len(), tools = tools.len(), "Calling model");

        let resp = self
            .add_provider_headers(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ParleyError::Http(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ParleyError::Http(e.to_string()))?;

        if status.as_u16() == 429 || status.is_server_error() {
            return Err(ParleyError::Http(format!("model API error {status}: {text}")));
        }
        if !status.is_success() {
            return Err(ParleyError::Rejected(format!("model API error {status}: {text}")));
        }

        let resp_body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ParleyError::Malformed(format!("response is not JSON: {e}")))?;

        parse_openai_response(&resp_body)
    }
}

/// A requested call as the API expects it back: arguments travel as a
/// JSON-encoded string.
fn wire_tool_call(call: &ToolCall) -> serde_json::Value {
    serde_json::json!({
        "id": call.id,
        "type": "function",
        "function": {
            "name": call.name,
            "arguments": call.arguments.to_string(),
        }
    })
}

/// Interpret a chat completions response body.
///
/// Tool call arguments may arrive either as a JSON-encoded string (OpenAI) or
/// as an object (some local servers); both are accepted. Anything else is
/// [`ParleyError::Malformed`].
pub fn parse_openai_response(body: &serde_json::Value) -> ParleyResult<ModelResponse> {
    let message = body["choices"][0]["message"]
        .as_object()
        .ok_or_else(|| ParleyError::Malformed("missing choices[0].message".to_string()))?;

    let text = message
        .get("content")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();

    let tool_calls = match message.get("tool_calls").and_then(serde_json::Value::as_array) {
        Some(calls) => calls
            .iter()
            .enumerate()
            .map(|(index, tc)| parse_tool_call(index, tc))
            .collect::<ParleyResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(ModelResponse { text, tool_calls })
}

fn parse_tool_call(index: usize, tc: &serde_json::Value) -> ParleyResult<ToolCall> {
    let name = tc["function"]["name"]
        .as_str()
        .ok_or_else(|| ParleyError::Malformed(format!("tool_calls[{index}] has no function name")))?
        .to_string();

    let id = tc["id"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("call_{index}"));

    let arguments = match &tc["function"]["arguments"] {
        serde_json::Value::String(raw) if raw.trim().is_empty() => serde_json::json!({}),
        serde_json::Value::String(raw) => serde_json::from_str(raw).map_err(|e| {
            ParleyError::Malformed(format!("tool_calls[{index}] arguments are not JSON: {e}"))
        })?,
        serde_json::Value::Null => serde_json::json!({}),
        other => other.clone(),
    };

    Ok(ToolCall {
        id,
        name,
        arguments,
    })
}
