use async_trait::async_trait;

/// Outgoing message. `fail_silently` asks the caller to drop delivery errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub message: String,
    pub from: String,
    pub to: Vec<String>,
    pub fail_silently: bool,
}

/// Transport-agnostic notification port (SMTP in production, log-only otherwise).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()>;
}
