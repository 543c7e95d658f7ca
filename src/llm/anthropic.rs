use super::{BackendError, CompletionBackend, Message, MessageRole};
use crate::config::AnthropicConfig;
use async_trait::async_trait;
use serde_json::json;

/// Client for the Anthropic Messages API.
///
/// The API key is a required constructor argument; there is no compiled-in
/// default and the key never appears in the config file.
pub struct AnthropicBackend {
    config: AnthropicConfig,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicBackend {
    pub fn new(config: AnthropicConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, messages: &[Message], max_tokens: u32) -> super::Result<String> {
        let url = format!("{}/messages", self.config.base_url);

        // The Messages API takes system prompts as a top-level field, not
        // as conversation entries.
        let mut system_prompt = String::new();
        let mut api_messages = Vec::new();
        for msg in messages {
            if msg.role == MessageRole::System {
                system_prompt.push_str(&msg.content);
                system_prompt.push('\n');
                continue;
            }
            api_messages.push(json!({
                "role": if msg.role == MessageRole::Assistant { "assistant" } else { "user" },
                "content": msg.content
            }));
        }

        let mut payload = json!({
            "model": self.config.model,
            "max_tokens": max_tokens,
            "messages": api_messages,
        });
        if !system_prompt.is_empty() {
            payload["system"] = json!(system_prompt);
        }

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| BackendError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(BackendError::AuthenticationFailed(text));
            } else if status.as_u16() == 429 {
                return Err(BackendError::RateLimitExceeded);
            } else {
                return Err(BackendError::InvalidRequest(text));
            }
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        let content_arr = data
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| BackendError::ParseError("No content array in response".to_string()))?;

        let mut full_content = String::new();
        for item in content_arr {
            if let Some(text) = item.get("text").and_then(|t| t.as_str()) {
                full_content.push_str(text);
            }
        }

        Ok(full_content)
    }
}
