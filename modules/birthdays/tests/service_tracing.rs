//! Tests to verify that the instrumented service methods run cleanly under a subscriber

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing_test::traced_test;
use uuid::Uuid;

use birthdays::contract::model::{Birthday, BirthdayForm, Congratulation, NewCongratulation};
use birthdays::domain::error::DomainError;
use birthdays::domain::ports::{Clock, Notification, Notifier};
use birthdays::domain::repo::BirthdaysRepository;
use birthdays::domain::service::{Service, ServiceConfig};
use modkit::SecurityCtx;

const AUTHOR: &str = "550e8400-e29b-41d4-a716-446655440000";
const RECORD: &str = "6fa459ea-ee8a-3ca4-894e-db77e160355e";

fn author() -> Uuid {
    Uuid::parse_str(AUTHOR).unwrap()
}

fn record_id() -> Uuid {
    Uuid::parse_str(RECORD).unwrap()
}

// Mock repository holding one record and whatever gets inserted
struct MockBirthdaysRepository {
    birthdays: Mutex<Vec<Birthday>>,
    congratulations: Mutex<Vec<Congratulation>>,
}

impl MockBirthdaysRepository {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            birthdays: Mutex::new(vec![Birthday {
                id: record_id(),
                first_name: "Ольга".to_string(),
                last_name: "Смирнова".to_string(),
                birthday: NaiveDate::from_ymd_opt(1988, 3, 14).unwrap(),
                tags: vec!["работа".to_string()],
                author: author(),
                created_at: now,
                updated_at: now,
            }]),
            congratulations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl BirthdaysRepository for MockBirthdaysRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Birthday>> {
        Ok(self
            .birthdays
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Birthday>> {
        Ok(self.birthdays.lock().unwrap().clone())
    }

    async fn person_exists(
        &self,
        first_name: &str,
        last_name: &str,
        birthday: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<bool> {
        Ok(self.birthdays.lock().unwrap().iter().any(|b| {
            Some(b.id) != exclude
                && b.first_name == first_name
                && b.last_name == last_name
                && b.birthday == birthday
        }))
    }

    async fn insert(&self, b: Birthday) -> Result<()> {
        self.birthdays.lock().unwrap().push(b);
        Ok(())
    }

    async fn update(&self, b: Birthday) -> Result<()> {
        let mut items = self.birthdays.lock().unwrap();
        if let Some(slot) = items.iter_mut().find(|x| x.id == b.id) {
            *slot = b;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut items = self.birthdays.lock().unwrap();
        let before = items.len();
        items.retain(|b| b.id != id);
        Ok(items.len() != before)
    }

    async fn list_congratulations(&self, birthday_id: Uuid) -> Result<Vec<Congratulation>> {
        Ok(self
            .congratulations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.birthday_id == birthday_id)
            .cloned()
            .collect())
    }

    async fn insert_congratulation(&self, c: Congratulation) -> Result<()> {
        self.congratulations.lock().unwrap().push(c);
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        Ok(vec!["работа".to_string()])
    }
}

// Mock notifier for testing
struct MockNotifier;

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}

struct MockClock;

impl Clock for MockClock {
    fn today(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()
    }
}

fn service() -> Service {
    Service::new(
        Arc::new(MockBirthdaysRepository::new()),
        Arc::new(MockNotifier),
        Arc::new(MockClock),
        ServiceConfig::default(),
    )
}

fn form(first_name: &str) -> BirthdayForm {
    BirthdayForm {
        first_name: first_name.to_string(),
        last_name: "Кузнецов".to_string(),
        birthday: NaiveDate::from_ymd_opt(1979, 11, 2).unwrap(),
        tags: vec!["семья".to_string()],
    }
}

#[traced_test]
#[tokio::test]
async fn get_birthday_emits_spans() {
    let service = service();

    let result = service.get_birthday(record_id()).await;

    let detail = result.unwrap();
    // 2024-12-30 -> 2025-03-14
    assert_eq!(detail.days_until, 74);
    assert!(detail.congratulations.is_empty());
}

#[traced_test]
#[tokio::test]
async fn list_birthdays_emits_spans() {
    let service = service();

    let result = service.list_birthdays().await;

    assert_eq!(result.unwrap().len(), 1);
}

#[traced_test]
#[tokio::test]
async fn create_birthday_emits_spans() {
    let service = service();
    let ctx = SecurityCtx::for_subject(Uuid::new_v4());

    let result = service.create_birthday(&ctx, form("Иван")).await;

    let created = result.unwrap();
    assert_eq!(created.author, ctx.subject().unwrap());
    assert_eq!(created.created_at, created.updated_at);
}

#[traced_test]
#[tokio::test]
async fn update_birthday_emits_spans() {
    let service = service();
    let ctx = SecurityCtx::for_subject(author());

    let result = service.update_birthday(&ctx, record_id(), form("Пётр")).await;

    let updated = result.unwrap();
    assert_eq!(updated.id, record_id());
    assert_eq!(updated.first_name, "Пётр");
    assert_eq!(updated.tags, vec!["семья".to_string()]);
}

#[traced_test]
#[tokio::test]
async fn delete_birthday_emits_spans() {
    let service = service();

    let denied = service
        .delete_birthday(&SecurityCtx::for_subject(Uuid::new_v4()), record_id())
        .await;
    assert!(matches!(denied, Err(DomainError::PermissionDenied { .. })));

    let result = service
        .delete_birthday(&SecurityCtx::for_subject(author()), record_id())
        .await;
    assert!(result.is_ok());
}

#[traced_test]
#[tokio::test]
async fn add_congratulation_emits_spans() {
    let service = service();
    let ctx = SecurityCtx::for_subject(Uuid::new_v4());

    let result = service
        .add_congratulation(
            &ctx,
            record_id(),
            NewCongratulation {
                text: "  С праздником!  ".to_string(),
            },
        )
        .await;

    let created = result.unwrap();
    assert_eq!(created.text, "С праздником!");
    assert_eq!(created.birthday_id, record_id());
}

#[traced_test]
#[tokio::test]
async fn list_tags_emits_spans() {
    let service = service();

    let result = service.list_tags().await;

    assert_eq!(result.unwrap(), vec!["работа".to_string()]);
}
