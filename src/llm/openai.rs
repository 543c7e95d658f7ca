use super::{BackendError, CompletionBackend, Message};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use serde_json::json;

/// Client for the OpenAI Chat Completions API.
///
/// Same construction contract as the Anthropic client: the API key is
/// injected by the caller, never defaulted.
pub struct OpenAiBackend {
    config: OpenAiConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(config: OpenAiConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, messages: &[Message], max_tokens: u32) -> super::Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut api_messages = Vec::new();
        for msg in messages {
            api_messages.push(json!({
                "role": msg.role.to_string(),
                "content": msg.content
            }));
        }

        let payload = json!({
            "model": self.config.model,
            "messages": api_messages,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let content = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| BackendError::ParseError("Empty content in response".to_string()))?;

        Ok(content.to_string())
    }
}
