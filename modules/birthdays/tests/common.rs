#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use birthdays::domain::ports::{Clock, Notification, Notifier};
use birthdays::domain::service::{Service, ServiceConfig};
use birthdays::infra::storage::migrations::Migrator;
use birthdays::infra::storage::SeaOrmBirthdaysRepository;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// "Today" for every test service.
pub const TODAY: (i32, u32, u32) = (2024, 12, 30);

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            anyhow::bail!("relay refused connection");
        }
        Ok(())
    }
}

/// Create a fresh test database for each test
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub struct TestEnv {
    pub service: Arc<Service>,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn create_test_env_with(notifier: RecordingNotifier) -> TestEnv {
    let db = create_test_db().await;
    let notifier = Arc::new(notifier);
    let service = Service::new(
        Arc::new(SeaOrmBirthdaysRepository::new(db)),
        notifier.clone(),
        Arc::new(FixedClock(date(TODAY.0, TODAY.1, TODAY.2))),
        ServiceConfig::default(),
    );
    TestEnv {
        service: Arc::new(service),
        notifier,
    }
}

pub async fn create_test_env() -> TestEnv {
    create_test_env_with(RecordingNotifier::default()).await
}

/// Bare module router, without the ingress stack.
pub fn router_for(env: &TestEnv) -> Router {
    birthdays::api::rest::routes::register_routes(Router::new(), env.service.clone())
}

pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        req = req.header("x-user-id", user.to_string());
    }
    let req = match body {
        Some(json) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
