mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use birthdays::contract::client::BirthdaysApi;
use birthdays::contract::error::BirthdaysError;
use birthdays::contract::model::{BirthdayForm, NewCongratulation};
use birthdays::gateways::local::BirthdaysLocalClient;
use birthdays::Birthdays;
use common::{call, create_test_env, create_test_env_with, date, router_for, RecordingNotifier};
use modkit::SecurityCtx;

fn anna() -> serde_json::Value {
    json!({
        "first_name": "Анна Мария",
        "last_name": "Иванова",
        "birthday": "1990-01-02",
        "tags": ["работа", "друзья", "работа"]
    })
}

#[tokio::test]
async fn create_list_and_get_detail() {
    let env = create_test_env().await;
    let app = router_for(&env);
    let author = Uuid::new_v4();

    let (status, created) = call(&app, "POST", "/birthdays", Some(author), Some(anna())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["first_name"], "Анна");
    assert_eq!(created["last_name"], "Иванова");
    assert_eq!(created["author"], author.to_string());
    assert_eq!(created["tags"], json!(["друзья", "работа"]));

    let (status, list) = call(&app, "GET", "/birthdays", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Test clock says 2024-12-30; January 2 is 3 days away.
    let id = created["id"].as_str().unwrap();
    let (status, detail) = call(&app, "GET", &format!("/birthdays/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["days_until"], 3);
    assert_eq!(detail["first_name"], "Анна");
    assert_eq!(detail["congratulations"], json!([]));

    let (status, tags) = call(&app, "GET", "/tags", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags, json!(["друзья", "работа"]));
}

#[tokio::test]
async fn anonymous_create_is_unauthenticated() {
    let env = create_test_env().await;
    let app = router_for(&env);

    let (status, problem) = call(&app, "POST", "/birthdays", None, Some(anna())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(problem["code"], "BIRTHDAYS_UNAUTHENTICATED");
    assert_eq!(problem["instance"], "/birthdays");

    let (_, list) = call(&app, "GET", "/birthdays", None, None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn denylisted_name_is_declined_and_reported() {
    let env = create_test_env().await;
    let app = router_for(&env);

    let body = json!({ "first_name": "Джон", "last_name": "Леннон", "birthday": "1940-10-09" });
    let (status, problem) = call(&app, "POST", "/birthdays", Some(Uuid::new_v4()), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "BIRTHDAYS_DECLINED");
    assert_eq!(
        problem["detail"],
        "Мы тоже любим Битлз, но введите, пожалуйста, настоящее имя!"
    );

    let sent = env.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Another Beatles member");
    assert_eq!(sent[0].message, "Джон Леннон пытался опубликовать запись!");
    assert_eq!(sent[0].to, vec!["admin@acme.not".to_string()]);

    let (_, list) = call(&app, "GET", "/birthdays", None, None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn failing_notifier_does_not_change_the_outcome() {
    let env = create_test_env_with(RecordingNotifier::failing()).await;
    let app = router_for(&env);

    let body = json!({ "first_name": "Джордж", "last_name": "Харрисон", "birthday": "1943-02-25" });
    let (status, problem) = call(&app, "POST", "/birthdays", Some(Uuid::new_v4()), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "BIRTHDAYS_DECLINED");
    assert_eq!(env.notifier.sent().len(), 1);
}

#[tokio::test]
async fn field_errors_are_reported_per_field() {
    let env = create_test_env().await;
    let app = router_for(&env);

    let body = json!({ "first_name": "   ", "birthday": "2030-01-01" });
    let (status, problem) = call(&app, "POST", "/birthdays", Some(Uuid::new_v4()), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "BIRTHDAYS_VALIDATION");
    let pointers: Vec<&str> = problem["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["pointer"].as_str().unwrap())
        .collect();
    assert_eq!(pointers, vec!["/first_name", "/birthday"]);
    assert!(env.notifier.sent().is_empty());
}

#[tokio::test]
async fn duplicate_person_conflicts() {
    let env = create_test_env().await;
    let app = router_for(&env);
    let user = Some(Uuid::new_v4());

    let (status, _) = call(&app, "POST", "/birthdays", user, Some(anna())).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same person after normalization, different tags
    let again = json!({ "first_name": "Анна", "last_name": " Иванова ", "birthday": "1990-01-02" });
    let (status, problem) = call(&app, "POST", "/birthdays", user, Some(again)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["code"], "BIRTHDAYS_CONFLICT");
}

#[tokio::test]
async fn only_the_author_may_update() {
    let env = create_test_env().await;
    let app = router_for(&env);
    let author = Uuid::new_v4();

    let (_, created) = call(&app, "POST", "/birthdays", Some(author), Some(anna())).await;
    let uri = format!("/birthdays/{}", created["id"].as_str().unwrap());

    let replacement = json!({
        "first_name": "Мария",
        "last_name": "Петрова",
        "birthday": "1985-07-15",
        "tags": ["семья"]
    });

    let (status, problem) = call(&app, "PUT", &uri, None, Some(replacement.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(problem["code"], "BIRTHDAYS_UNAUTHENTICATED");

    let (status, problem) =
        call(&app, "PUT", &uri, Some(Uuid::new_v4()), Some(replacement.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(problem["code"], "BIRTHDAYS_FORBIDDEN");

    let (status, updated) = call(&app, "PUT", &uri, Some(author), Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["first_name"], "Мария");
    assert_eq!(updated["last_name"], "Петрова");
    assert_eq!(updated["birthday"], "1985-07-15");
    assert_eq!(updated["tags"], json!(["семья"]));
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn update_goes_through_the_same_validation() {
    let env = create_test_env().await;
    let app = router_for(&env);
    let author = Uuid::new_v4();

    let (_, created) = call(&app, "POST", "/birthdays", Some(author), Some(anna())).await;
    let uri = format!("/birthdays/{}", created["id"].as_str().unwrap());

    let beatle = json!({ "first_name": "Ринго", "last_name": "Старр", "birthday": "1940-07-07" });
    let (status, problem) = call(&app, "PUT", &uri, Some(author), Some(beatle)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "BIRTHDAYS_DECLINED");
    assert_eq!(env.notifier.sent().len(), 1);

    // Saving a record unchanged does not conflict with itself
    let (status, _) = call(&app, "PUT", &uri, Some(author), Some(anna())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_record_wins_over_permission() {
    let env = create_test_env().await;
    let app = router_for(&env);
    let uri = format!("/birthdays/{}", Uuid::new_v4());

    let (status, problem) = call(&app, "PUT", &uri, None, Some(anna())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["code"], "BIRTHDAYS_NOT_FOUND");

    let (status, _) = call(&app, "DELETE", &uri, Some(Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_cascades_congratulations() {
    let env = create_test_env().await;
    let app = router_for(&env);
    let author = Uuid::new_v4();
    let guest = Uuid::new_v4();

    let (_, created) = call(&app, "POST", "/birthdays", Some(author), Some(anna())).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/birthdays/{id}");

    let (status, _) = call(
        &app,
        "POST",
        &format!("{uri}/congratulations"),
        Some(guest),
        Some(json!({ "text": "С днём рождения!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(&app, "DELETE", &uri, Some(guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, "DELETE", &uri, Some(author), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, _) = call(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = env
        .service
        .get_birthday(Uuid::parse_str(id).unwrap())
        .await;
    assert!(remaining.is_err());
}

#[tokio::test]
async fn congratulations_flow() {
    let env = create_test_env().await;
    let app = router_for(&env);
    let author = Uuid::new_v4();
    let guest = Uuid::new_v4();

    let (_, created) = call(&app, "POST", "/birthdays", Some(author), Some(anna())).await;
    let base = format!("/birthdays/{}", created["id"].as_str().unwrap());
    let uri = format!("{base}/congratulations");

    let (status, problem) = call(&app, "POST", &uri, None, Some(json!({ "text": "Ура" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(problem["code"], "BIRTHDAYS_UNAUTHENTICATED");

    let missing = format!("/birthdays/{}/congratulations", Uuid::new_v4());
    let (status, _) = call(&app, "POST", &missing, Some(guest), Some(json!({ "text": "Ура" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, problem) = call(&app, "POST", &uri, Some(guest), Some(json!({ "text": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["errors"][0]["pointer"], "/text");

    for text in ["Первое", "Второе"] {
        let (status, c) = call(&app, "POST", &uri, Some(guest), Some(json!({ "text": text }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(c["author"], guest.to_string());
    }

    let (_, detail) = call(&app, "GET", &base, None, None).await;
    let texts: Vec<&str> = detail["congratulations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Первое", "Второе"]);
}

#[tokio::test]
async fn malformed_requests_get_problem_documents() {
    let env = create_test_env().await;
    let app = router_for(&env);

    let (status, problem) = call(
        &app,
        "POST",
        "/birthdays",
        Some(Uuid::new_v4()),
        Some(json!({ "first_name": "Анна", "birthday": "not-a-date" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "BIRTHDAYS_BAD_REQUEST");

    let (status, problem) = call(&app, "GET", "/birthdays/42", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "BIRTHDAYS_BAD_REQUEST");
}

#[tokio::test]
async fn served_through_the_ingress_stack() {
    let env = create_test_env().await;
    let ingress = api_ingress::ApiIngress::new(api_ingress::ApiIngressConfig::default());
    let app = ingress
        .build_router(router_for(&env), Birthdays::openapi())
        .unwrap();

    let (status, _) = call(&app, "POST", "/birthdays", Some(Uuid::new_v4()), Some(anna())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, doc) = call(&app, "GET", "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/birthdays/{id}/congratulations").is_some());
}

#[tokio::test]
async fn local_client_maps_contract_errors() -> Result<()> {
    let env = create_test_env().await;
    let client = BirthdaysLocalClient::new(env.service.clone());
    let author = SecurityCtx::for_subject(Uuid::new_v4());

    let form = BirthdayForm {
        first_name: "Пётр".into(),
        last_name: String::new(),
        birthday: date(1972, 6, 9),
        tags: vec![],
    };
    let created = client.create_birthday(&author, form.clone()).await?;
    assert_eq!(created.last_name, "");

    let stranger = SecurityCtx::for_subject(Uuid::new_v4());
    assert_eq!(
        client.delete_birthday(&stranger, created.id).await,
        Err(BirthdaysError::Forbidden)
    );
    assert_eq!(
        client.create_birthday(&SecurityCtx::anonymous(), form.clone()).await,
        Err(BirthdaysError::Unauthenticated)
    );
    assert_eq!(
        client.create_birthday(&author, form).await,
        Err(BirthdaysError::Conflict)
    );

    let c = client
        .add_congratulation(
            &stranger,
            created.id,
            NewCongratulation {
                text: "Поздравляю".into(),
            },
        )
        .await?;
    let detail = client.get_birthday(created.id).await?;
    assert_eq!(detail.congratulations, vec![c]);

    client.delete_birthday(&author, created.id).await?;
    assert_eq!(
        client.get_birthday(created.id).await,
        Err(BirthdaysError::not_found(created.id))
    );
    Ok(())
}
