use async_trait::async_trait;
use nd_core::Result;

use super::{Notification, Notifier};

/// No-op notifier for testing.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn publish(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}
