mod common;

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use api_ingress::{ApiIngress, ApiIngressConfig};
use birthdays::config::{NotificationsConfig, SmtpConfig};
use birthdays::domain::form::DECLINED_MESSAGE;
use birthdays::{Birthdays, BirthdaysConfig};
use common::{call, create_test_db};

/// Accepts SMTP connections and never sends the greeting.
async fn silent_relay() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    port
}

#[tokio::test]
async fn denylisted_submission_is_declined_while_the_relay_hangs() {
    let port = silent_relay().await;
    let cfg = BirthdaysConfig {
        notifications: NotificationsConfig {
            smtp: Some(SmtpConfig {
                host: "127.0.0.1".into(),
                port,
                username: None,
                password: None,
                starttls: false,
                timeout_sec: 30,
            }),
            send_timeout_ms: 200,
            ..NotificationsConfig::default()
        },
        ..BirthdaysConfig::default()
    };
    let module = Birthdays::init(cfg, create_test_db().await).await.unwrap();

    let ingress = ApiIngress::new(ApiIngressConfig {
        request_timeout_sec: 1,
        ..ApiIngressConfig::default()
    });
    let app = ingress
        .build_router(module.register_rest(axum::Router::new()), Birthdays::openapi())
        .unwrap();

    let started = Instant::now();
    let (status, problem) = call(
        &app,
        "POST",
        "/birthdays",
        Some(Uuid::new_v4()),
        Some(json!({
            "first_name": "Джордж",
            "last_name": "Харрисон",
            "birthday": "1943-02-25"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "BIRTHDAYS_DECLINED");
    assert_eq!(problem["detail"], DECLINED_MESSAGE);
    assert!(started.elapsed() < Duration::from_secs(1));
}
