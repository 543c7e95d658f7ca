//! Notification Extension Point
//!
//! Generic "notify event" seam for external alerting channels. The pipeline
//! fires events at task boundaries; delivery is best-effort and never
//! affects task correctness. The webhook implementation posts events as
//! JSON to a configured channel webhook (Discord-compatible payload).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// An observability event: text plus optional structured fields
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: serde_json::Map::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach a structured field
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn task_started(task: &str) -> Self {
        Self::new(format!("Task started: {}", task))
    }

    pub fn task_completed(task: &str) -> Self {
        Self::new(format!("Task completed: {}", task))
    }

    pub fn task_failed(task: &str, step: usize) -> Self {
        Self::new(format!("Task failed: {}", task))
            .with_field("failed_step", serde_json::json!(step))
    }
}

/// Delivery seam for observability events
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one event. Errors are reported to the caller but the
    /// pipeline only logs them; a dead channel never fails a task.
    async fn notify(&self, event: &Event) -> anyhow::Result<()>;
}

/// Posts events as JSON to a webhook URL
pub struct WebhookNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &Event) -> anyhow::Result<()> {
        let content = if event.fields.is_empty() {
            event.message.clone()
        } else {
            format!(
                "{} {}",
                event.message,
                serde_json::Value::Object(event.fields.clone())
            )
        };

        let payload = serde_json::json!({ "content": content });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("webhook returned status {}", response.status());
        }

        debug!("event delivered to webhook");
        Ok(())
    }
}

/// Drops every event; useful in tests and when no channel is configured
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _event: &Event) -> anyhow::Result<()> {
        Ok(())
    }
}
