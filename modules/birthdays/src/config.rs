use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::form::{AgeBounds, AlertRecipients, DEFAULT_ALERT_FROM, DEFAULT_ALERT_TO};

/// Configuration for the birthdays module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BirthdaysConfig {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default = "default_min_age_years")]
    pub min_age_years: u32,
    #[serde(default = "default_max_age_years")]
    pub max_age_years: u32,
}

impl Default for BirthdaysConfig {
    fn default() -> Self {
        Self {
            notifications: NotificationsConfig::default(),
            min_age_years: default_min_age_years(),
            max_age_years: default_max_age_years(),
        }
    }
}

impl BirthdaysConfig {
    pub fn age_bounds(&self) -> AgeBounds {
        AgeBounds {
            min_years: self.min_age_years,
            max_years: self.max_age_years,
        }
    }

    pub fn alert_recipients(&self) -> AlertRecipients {
        AlertRecipients {
            from: self.notifications.from_email.clone(),
            to: self.notifications.admin_emails.clone(),
            send_timeout: Duration::from_millis(self.notifications.send_timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    #[serde(default = "default_from_email")]
    pub from_email: String,
    #[serde(default = "default_admin_emails")]
    pub admin_emails: Vec<String>,
    /// Without a relay, notifications are only logged.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    /// Budget for one alert delivery; keep it below the ingress request timeout.
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            from_email: default_from_email(),
            admin_emails: default_admin_emails(),
            smtp: None,
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// `false` talks plain SMTP (local relays, test catchers).
    #[serde(default = "default_starttls")]
    pub starttls: bool,
    #[serde(default = "default_smtp_timeout_sec")]
    pub timeout_sec: u64,
}

fn default_min_age_years() -> u32 {
    1
}

fn default_max_age_years() -> u32 {
    120
}

fn default_from_email() -> String {
    DEFAULT_ALERT_FROM.to_string()
}

fn default_admin_emails() -> Vec<String> {
    vec![DEFAULT_ALERT_TO.to_string()]
}

fn default_send_timeout_ms() -> u64 {
    2000
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

fn default_smtp_timeout_sec() -> u64 {
    10
}
