use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Notification, Notifier};

/// Used when no SMTP relay is configured: the message only reaches the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        info!(
            subject = %notification.subject,
            from = %notification.from,
            to = ?notification.to,
            message = %notification.message,
            "Notification (mail transport not configured)"
        );
        Ok(())
    }
}
