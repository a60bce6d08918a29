use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::{Birthday, Congratulation};

/// Raised by `insert`/`update` when the unique (first name, last name, birthday)
/// index rejects the row, e.g. after a concurrent write passed `person_exists`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("a record for this person already exists")]
pub struct DuplicatePerson;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait BirthdaysRepository: Send + Sync {
    /// Load a birthday (with its tags) by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Birthday>>;
    /// All birthdays with their tags, oldest first.
    async fn list_all(&self) -> anyhow::Result<Vec<Birthday>>;
    /// Whether another record already describes this person.
    /// `exclude` skips the record being updated.
    async fn person_exists(
        &self,
        first_name: &str,
        last_name: &str,
        birthday: NaiveDate,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<bool>;
    /// Insert a fully-formed birthday and its tag links in one transaction.
    /// Fails with [`DuplicatePerson`] when the person is already stored.
    async fn insert(&self, b: Birthday) -> anyhow::Result<()>;
    /// Replace an existing birthday (by `b.id`) and its tag links in one transaction.
    /// Fails with [`DuplicatePerson`] when another record describes the same person.
    async fn update(&self, b: Birthday) -> anyhow::Result<()>;
    /// Delete by id, cascading to congratulations and tag links.
    /// Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Congratulations of one birthday, oldest first.
    async fn list_congratulations(&self, birthday_id: Uuid) -> anyhow::Result<Vec<Congratulation>>;
    async fn insert_congratulation(&self, c: Congratulation) -> anyhow::Result<()>;
    /// Every known tag label, sorted.
    async fn list_tags(&self) -> anyhow::Result<Vec<String>>;
}
