use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::SmtpConfig;
use crate::domain::ports::{Notification, Notifier};

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        info!("Initializing SMTP notifier for {}:{}", cfg.host, cfg.port);

        let mut builder = if cfg.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
                .with_context(|| format!("failed to create SMTP relay for '{}'", cfg.host))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host)
        };
        builder = builder
            .port(cfg.port)
            .timeout(Some(Duration::from_secs(cfg.timeout_sec)));
        if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    fn build_message(notification: &Notification) -> anyhow::Result<Message> {
        let mut builder = Message::builder()
            .from(
                notification
                    .from
                    .parse::<Mailbox>()
                    .context("failed to parse from address")?,
            )
            .subject(notification.subject.clone());
        for to in &notification.to {
            builder = builder.to(to
                .parse::<Mailbox>()
                .with_context(|| format!("failed to parse recipient '{to}'"))?);
        }
        builder
            .body(notification.message.clone())
            .context("failed to build message")
    }

    async fn deliver(&self, notification: &Notification) -> anyhow::Result<()> {
        let message = Self::build_message(notification)?;
        self.transport
            .send(message)
            .await
            .context("failed to send mail")?;
        info!(
            recipients = notification.to.len(),
            subject = %notification.subject,
            "Notification mail sent"
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        if notification.to.is_empty() {
            info!("No recipients configured, skipping mail");
            return Ok(());
        }
        match self.deliver(notification).await {
            Err(e) if notification.fail_silently => {
                warn!(error = %e, "Notification mail dropped");
                Ok(())
            }
            other => other,
        }
    }
}
