use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A tracked birthday (no serde/schema, transport types live in `api::rest::dto`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Birthday {
    pub id: Uuid,
    pub first_name: String,
    /// Empty when the submitter gave no last name.
    pub last_name: String,
    pub birthday: NaiveDate,
    /// Sorted, no duplicates.
    pub tags: Vec<String>,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw submission for create and update, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayForm {
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Congratulation {
    pub id: Uuid,
    pub birthday_id: Uuid,
    pub text: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCongratulation {
    pub text: String,
}

/// Detail view: the record, days until the next occurrence, and its congratulations
/// oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayDetail {
    pub birthday: Birthday,
    pub days_until: u32,
    pub congratulations: Vec<Congratulation>,
}
