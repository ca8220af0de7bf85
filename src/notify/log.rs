//! Log-only notifier.
//!
//! Used when email delivery is not configured. Every notification succeeds
//! and is written to the log instead.

use super::{Notification, Notifier, NotifyError};
use async_trait::async_trait;
use tracing::info;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            subject = %notification.subject,
            body = %notification.body,
            "Notification (log only)"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
