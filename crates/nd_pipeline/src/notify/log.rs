use async_trait::async_trait;
use nd_core::Result;
use tracing::info;

use super::{Notification, Notifier};

/// Writes notifications to the tracing log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, notification: &Notification) -> Result<()> {
        info!(subject = %notification.subject, "{}", notification.message);
        Ok(())
    }
}
