//! Failure notifications.
//!
//! Alerts are best-effort: delivery failures are logged at warn and
//! swallowed, never escalated to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::AlertSettings;

/// Best-effort side channel for unrecoverable errors.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn notify(&self, summary: &str, detail: &str);
}

/// Sink used when notifications are disabled; failures still land in the log.
pub struct LogAlerts;

#[async_trait]
impl AlertSink for LogAlerts {
    async fn notify(&self, summary: &str, detail: &str) {
        warn!(summary, detail, "alert (notifications disabled)");
    }
}

/// Publishes alerts as JSON to a webhook endpoint.
pub struct HttpAlerts {
    client: reqwest::Client,
    webhook_url: String,
    topic: String,
}

impl HttpAlerts {
    pub fn new(
        client: reqwest::Client,
        webhook_url: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl AlertSink for HttpAlerts {
    async fn notify(&self, summary: &str, detail: &str) {
        let payload = serde_json::json!({
            "topic": self.topic,
            "summary": summary,
            "detail": detail,
        });

        match self.client.post(&self.webhook_url).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(
                    status = %response.status(),
                    summary,
                    "alert delivery rejected"
                );
            }
            Err(err) => {
                warn!(error = %err, summary, "alert delivery failed");
            }
            Ok(_) => {}
        }
    }
}

/// Build the sink the settings ask for.
pub fn from_settings(settings: &AlertSettings, client: reqwest::Client) -> Arc<dyn AlertSink> {
    match (&settings.webhook_url, settings.failure_notifications) {
        (Some(url), true) => Arc::new(HttpAlerts::new(client, url.clone(), settings.topic.clone())),
        _ => Arc::new(LogAlerts),
    }
}
