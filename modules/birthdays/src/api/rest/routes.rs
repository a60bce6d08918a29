use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use modkit::api::problem::{Problem, ValidationError};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    info(title = "Acme Birthdays", description = "Birthdays and congratulations"),
    paths(
        handlers::list_birthdays,
        handlers::get_birthday,
        handlers::create_birthday,
        handlers::update_birthday,
        handlers::delete_birthday,
        handlers::add_congratulation,
        handlers::list_tags,
    ),
    components(schemas(
        dto::BirthdayDto,
        dto::BirthdayDetailDto,
        dto::BirthdayReq,
        dto::CongratulationDto,
        dto::CongratulationReq,
        Problem,
        ValidationError,
    )),
    tags((name = "birthdays", description = "Birthday records, congratulations and tags"))
)]
pub struct ApiDoc;

/// OpenAPI document for the routes below.
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route(
            "/birthdays",
            get(handlers::list_birthdays).post(handlers::create_birthday),
        )
        .route(
            "/birthdays/{id}",
            get(handlers::get_birthday)
                .put(handlers::update_birthday)
                .delete(handlers::delete_birthday),
        )
        .route(
            "/birthdays/{id}/congratulations",
            post(handlers::add_congratulation),
        )
        .route("/tags", get(handlers::list_tags))
        .layer(Extension(service))
}
