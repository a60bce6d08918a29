//! Submission cleaning for birthdays and congratulations.
//!
//! A birthday form goes through two stages. The field stage runs every field
//! step and collects all errors. The whole-form stage runs only when every field
//! is clean and rejects names from the denylist, alerting the administrators.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::contract::model::{BirthdayForm, NewCongratulation};
use crate::domain::error::{DomainError, FieldError};
use crate::domain::ports::{Notification, Notifier};

pub const MAX_NAME_LEN: usize = 20;
pub const MAX_TAG_LEN: usize = 20;

/// Full names ("first last") that may not be submitted.
pub const DISALLOWED_NAMES: [&str; 4] = [
    "Джон Леннон",
    "Пол Маккартни",
    "Джордж Харрисон",
    "Ринго Старр",
];

pub const DECLINED_MESSAGE: &str = "Мы тоже любим Битлз, но введите, пожалуйста, настоящее имя!";
pub const ALERT_SUBJECT: &str = "Another Beatles member";
pub const DEFAULT_ALERT_FROM: &str = "birthday_form@acme.not";
pub const DEFAULT_ALERT_TO: &str = "admin@acme.not";
/// Stays well below the ingress request timeout.
pub const DEFAULT_ALERT_TIMEOUT: Duration = Duration::from_secs(2);

/// Accepted age range in whole years (days since birth / 365).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBounds {
    pub min_years: u32,
    pub max_years: u32,
}

impl Default for AgeBounds {
    fn default() -> Self {
        Self {
            min_years: 1,
            max_years: 120,
        }
    }
}

/// Sender and recipients of the denylist alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecipients {
    pub from: String,
    pub to: Vec<String>,
    /// Upper bound on one delivery attempt; the rejection is returned either way.
    pub send_timeout: Duration,
}

impl Default for AlertRecipients {
    fn default() -> Self {
        Self {
            from: DEFAULT_ALERT_FROM.to_string(),
            to: vec![DEFAULT_ALERT_TO.to_string()],
            send_timeout: DEFAULT_ALERT_TIMEOUT,
        }
    }
}

/// A birthday submission that passed the field stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedBirthday {
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
    pub tags: BTreeSet<String>,
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len > max {
        return Err(FieldError::new(
            field,
            format!("at most {max} characters allowed, got {len}"),
        ));
    }
    Ok(())
}

/// Keeps the first whitespace-delimited token.
pub fn clean_first_name(raw: &str) -> Result<String, FieldError> {
    let first = raw
        .split_whitespace()
        .next()
        .ok_or_else(|| FieldError::new("first_name", "must not be empty"))?;
    check_len("first_name", first, MAX_NAME_LEN)?;
    Ok(first.to_string())
}

/// Optional; surrounding whitespace is dropped.
pub fn clean_last_name(raw: &str) -> Result<String, FieldError> {
    let last = raw.trim();
    check_len("last_name", last, MAX_NAME_LEN)?;
    Ok(last.to_string())
}

pub fn clean_birthday(
    birthday: NaiveDate,
    today: NaiveDate,
    bounds: AgeBounds,
) -> Result<NaiveDate, FieldError> {
    let days = (today - birthday).num_days();
    if days < 0 {
        return Err(FieldError::new("birthday", "must not be in the future"));
    }
    let years = days / 365;
    if years < i64::from(bounds.min_years) || years > i64::from(bounds.max_years) {
        return Err(FieldError::new(
            "birthday",
            format!(
                "age must be between {} and {} years",
                bounds.min_years, bounds.max_years
            ),
        ));
    }
    Ok(birthday)
}

/// Trims labels and collapses duplicates.
pub fn clean_tags(raw: &[String]) -> Result<BTreeSet<String>, FieldError> {
    let mut tags = BTreeSet::new();
    for tag in raw {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(FieldError::new("tags", "tag must not be empty"));
        }
        check_len("tags", tag, MAX_TAG_LEN)?;
        tags.insert(tag.to_string());
    }
    Ok(tags)
}

/// Field stage: every step runs, errors are reported together.
pub fn clean_fields(
    form: &BirthdayForm,
    today: NaiveDate,
    bounds: AgeBounds,
) -> Result<CleanedBirthday, DomainError> {
    let first_name = clean_first_name(&form.first_name);
    let last_name = clean_last_name(&form.last_name);
    let birthday = clean_birthday(form.birthday, today, bounds);
    let tags = clean_tags(&form.tags);

    match (first_name, last_name, birthday, tags) {
        (Ok(first_name), Ok(last_name), Ok(birthday), Ok(tags)) => Ok(CleanedBirthday {
            first_name,
            last_name,
            birthday,
            tags,
        }),
        (first_name, last_name, birthday, tags) => {
            let errors = [
                first_name.err(),
                last_name.err(),
                birthday.err(),
                tags.err(),
            ]
            .into_iter()
            .flatten()
            .collect();
            Err(DomainError::invalid_fields(errors))
        }
    }
}

pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

pub fn is_disallowed(first_name: &str, last_name: &str) -> bool {
    let name = full_name(first_name, last_name);
    DISALLOWED_NAMES.contains(&name.as_str())
}

pub fn intrusion_alert(first_name: &str, last_name: &str, recipients: &AlertRecipients) -> Notification {
    Notification {
        subject: ALERT_SUBJECT.to_string(),
        message: format!("{first_name} {last_name} пытался опубликовать запись!"),
        from: recipients.from.clone(),
        to: recipients.to.clone(),
        fail_silently: true,
    }
}

/// Whole-form stage. A failed or stalled delivery is logged and never changes the outcome.
pub async fn check_denylist(
    cleaned: &CleanedBirthday,
    notifier: &dyn Notifier,
    recipients: &AlertRecipients,
) -> Result<(), DomainError> {
    if !is_disallowed(&cleaned.first_name, &cleaned.last_name) {
        return Ok(());
    }

    debug!("Submission matches the denylist, alerting administrators");
    let alert = intrusion_alert(&cleaned.first_name, &cleaned.last_name, recipients);
    match tokio::time::timeout(recipients.send_timeout, notifier.send(&alert)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Denylist alert was not delivered"),
        Err(_) => warn!(
            timeout_ms = recipients.send_timeout.as_millis() as u64,
            "Denylist alert delivery timed out"
        ),
    }
    Err(DomainError::declined(DECLINED_MESSAGE))
}

/// Full pipeline shared by create and update.
pub async fn validate_birthday(
    form: &BirthdayForm,
    today: NaiveDate,
    bounds: AgeBounds,
    notifier: &dyn Notifier,
    recipients: &AlertRecipients,
) -> Result<CleanedBirthday, DomainError> {
    let cleaned = clean_fields(form, today, bounds)?;
    check_denylist(&cleaned, notifier, recipients).await?;
    Ok(cleaned)
}

pub fn clean_congratulation(new: &NewCongratulation) -> Result<String, DomainError> {
    let text = new.text.trim();
    if text.is_empty() {
        return Err(DomainError::invalid_fields(vec![FieldError::new(
            "text",
            "must not be empty",
        )]));
    }
    Ok(text.to_string())
}
