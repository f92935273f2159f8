use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nd_core::{PipelineStatus, Result};
use serde::{Deserialize, Serialize};

pub mod log;
pub mod noop;
pub mod webhook;

pub use self::log::LogNotifier;
pub use noop::NoopNotifier;
pub use webhook::WebhookNotifier;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subject: String,
    pub message: String,
}

impl Notification {
    /// The per-run status message sent once the dispatch step is over.
    pub fn for_run(
        status: PipelineStatus,
        s3_key: &str,
        command_id: Option<&str>,
        at: DateTime<Utc>,
    ) -> Self {
        let message = format!(
            "\n==============================\n\
             📌 Daily NLP Pipeline Status\n\
             ==============================\n\n\
             🟢 Status: {status}\n\n\
             📁 Saved CSV:\n{s3_key}\n\n\
             ⚙️ Analyzer Command ID:\n{command_id}\n\n\
             ⏱ Time:\n{time}\n\n",
            status = status,
            s3_key = s3_key,
            command_id = command_id.unwrap_or(NOT_AVAILABLE),
            time = at.format("%Y-%m-%d %H:%M:%S UTC"),
        );
        Self {
            subject: format!("[{}] Daily NLP Pipeline", status),
            message,
        }
    }
}

/// Pluggable delivery for run notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, notification: &Notification) -> Result<()>;
}
