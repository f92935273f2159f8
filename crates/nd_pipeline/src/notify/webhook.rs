use std::time::Duration;

use async_trait::async_trait;
use nd_core::{Error, Result};
use serde_json::json;
use tracing::{info, warn};

use super::{Notification, Notifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Incoming-webhook notifier. Posts `{topic, subject, text}`.
pub struct WebhookNotifier {
    webhook_url: String,
    topic: String,
    http: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>, topic: impl Into<String>) -> Result<Self> {
        Self::with_timeout(webhook_url, topic, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(webhook_url: impl Into<String>, topic: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            webhook_url: webhook_url.into(),
            topic: topic.into(),
            http: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    fn payload(&self, notification: &Notification) -> serde_json::Value {
        json!({
            "topic": self.topic,
            "subject": notification.subject,
            "text": notification.message,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn publish(&self, notification: &Notification) -> Result<()> {
        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&self.payload(notification))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Webhook returned non-success");
            return Err(Error::Notification(format!("webhook returned {}", status)));
        }

        info!(topic = %self.topic, "Notification sent: {}", notification.subject);
        Ok(())
    }
}
