use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path},
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::SecurityCtx;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::dto::{
    BirthdayDetailDto, BirthdayDto, BirthdayReq, CongratulationDto, CongratulationReq,
};
use crate::api::rest::error::{map_domain_error, map_json_rejection, map_path_rejection};
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;
type IdParam = Result<Path<Uuid>, PathRejection>;
type Body<T> = Result<Json<T>, JsonRejection>;

fn path_id(id: IdParam, uri: &Uri) -> Result<Uuid, ProblemResponse> {
    id.map(|Path(id)| id)
        .map_err(|rej| map_path_rejection(&rej, uri.path()))
}

fn body<T>(req: Body<T>, uri: &Uri) -> Result<T, ProblemResponse> {
    req.map(|Json(v)| v)
        .map_err(|rej| map_json_rejection(&rej, uri.path()))
}

/// List all birthdays with their tags
#[utoipa::path(
    get,
    path = "/birthdays",
    tag = "birthdays",
    operation_id = "birthdays.list_birthdays",
    responses(
        (status = 200, description = "All birthdays, oldest first", body = [BirthdayDto]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_birthdays(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<Json<Vec<BirthdayDto>>, ProblemResponse> {
    info!("Listing birthdays");

    let items = svc
        .list_birthdays()
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(items.into_iter().map(BirthdayDto::from).collect()))
}

/// Get a birthday with its countdown and congratulations
#[utoipa::path(
    get,
    path = "/birthdays/{id}",
    tag = "birthdays",
    operation_id = "birthdays.get_birthday",
    params(("id" = Uuid, Path, description = "Birthday id")),
    responses(
        (status = 200, description = "Birthday found", body = BirthdayDetailDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_birthday(
    Extension(svc): Svc,
    uri: Uri,
    id: IdParam,
) -> Result<Json<BirthdayDetailDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    info!("Getting birthday with id: {}", id);

    let detail = svc
        .get_birthday(id)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(detail.into()))
}

/// Create a birthday; the caller becomes its author
#[utoipa::path(
    post,
    path = "/birthdays",
    tag = "birthdays",
    operation_id = "birthdays.create_birthday",
    params(("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id")),
    request_body = BirthdayReq,
    responses(
        (status = 201, description = "Created birthday", body = BirthdayDto),
        (status = 400, description = "Validation failed or submission declined", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Login required", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Birthday for this person already exists", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_birthday(
    Extension(svc): Svc,
    ctx: SecurityCtx,
    uri: Uri,
    req: Body<BirthdayReq>,
) -> Result<(StatusCode, Json<BirthdayDto>), ProblemResponse> {
    let req = body(req, &uri)?;
    info!("Creating birthday for: {}", req.first_name);

    let created = svc
        .create_birthday(&ctx, req.into())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Replace a birthday; author only
#[utoipa::path(
    put,
    path = "/birthdays/{id}",
    tag = "birthdays",
    operation_id = "birthdays.update_birthday",
    params(
        ("id" = Uuid, Path, description = "Birthday id"),
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    request_body = BirthdayReq,
    responses(
        (status = 200, description = "Updated birthday", body = BirthdayDto),
        (status = 400, description = "Validation failed or submission declined", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Login required", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller is not the author", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Birthday for this person already exists", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_birthday(
    Extension(svc): Svc,
    ctx: SecurityCtx,
    uri: Uri,
    id: IdParam,
    req: Body<BirthdayReq>,
) -> Result<Json<BirthdayDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let req = body(req, &uri)?;
    info!("Updating birthday {}", id);

    let updated = svc
        .update_birthday(&ctx, id, req.into())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(updated.into()))
}

/// Delete a birthday with its congratulations; author only
#[utoipa::path(
    delete,
    path = "/birthdays/{id}",
    tag = "birthdays",
    operation_id = "birthdays.delete_birthday",
    params(
        ("id" = Uuid, Path, description = "Birthday id"),
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 204, description = "Birthday deleted"),
        (status = 401, description = "Login required", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller is not the author", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_birthday(
    Extension(svc): Svc,
    ctx: SecurityCtx,
    uri: Uri,
    id: IdParam,
) -> Result<StatusCode, ProblemResponse> {
    let id = path_id(id, &uri)?;
    info!("Deleting birthday: {}", id);

    svc.delete_birthday(&ctx, id)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a congratulation to a birthday
#[utoipa::path(
    post,
    path = "/birthdays/{id}/congratulations",
    tag = "birthdays",
    operation_id = "birthdays.add_congratulation",
    params(
        ("id" = Uuid, Path, description = "Birthday id"),
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    request_body = CongratulationReq,
    responses(
        (status = 201, description = "Created congratulation", body = CongratulationDto),
        (status = 400, description = "Empty text", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Login required", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn add_congratulation(
    Extension(svc): Svc,
    ctx: SecurityCtx,
    uri: Uri,
    id: IdParam,
    req: Body<CongratulationReq>,
) -> Result<(StatusCode, Json<CongratulationDto>), ProblemResponse> {
    let id = path_id(id, &uri)?;
    let req = body(req, &uri)?;
    info!("Adding congratulation to birthday {}", id);

    let created = svc
        .add_congratulation(&ctx, id, req.into())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List all tag labels
#[utoipa::path(
    get,
    path = "/tags",
    tag = "birthdays",
    operation_id = "birthdays.list_tags",
    responses(
        (status = 200, description = "Known tags, sorted", body = [String]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_tags(
    Extension(svc): Svc,
    uri: Uri,
) -> Result<Json<Vec<String>>, ProblemResponse> {
    let tags = svc
        .list_tags()
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(tags))
}
