use axum::{
    extract::Request,
    http::{header, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use modkit::api::problem::{not_found, Problem, ProblemResponse};
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Unmatched routes answer with a problem document like every other failure.
pub async fn route_not_found(uri: Uri) -> ProblemResponse {
    let mut resp = not_found(format!("No route for '{}'", uri.path()));
    resp.0.code = "ROUTE_NOT_FOUND".to_string();
    resp.0.instance = uri.path().to_string();
    resp
}

/// Replaces the bare 408 emitted by the timeout layer with a problem document.
/// A 408 that already carries a body type was produced by a handler and is kept.
pub async fn timeout_as_problem(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let resp = next.run(req).await;
    if resp.status() != StatusCode::REQUEST_TIMEOUT
        || resp.headers().contains_key(header::CONTENT_TYPE)
    {
        return resp;
    }
    tracing::warn!(path = %path, "request timed out");
    ProblemResponse(
        Problem::new(
            StatusCode::REQUEST_TIMEOUT,
            "Request Timeout",
            "The request did not complete in time",
        )
        .with_code("REQUEST_TIMEOUT")
        .with_instance(path),
    )
    .into_response()
}
