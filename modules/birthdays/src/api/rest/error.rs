use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse, ValidationError};

use crate::domain::error::{DomainError, PermissionReason};

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.acme.not/{code}"))
        .with_code(code)
        .with_instance(instance);
    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::BirthdayNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "BIRTHDAYS_NOT_FOUND",
            "Birthday not found",
            format!("Birthday with id {id} was not found"),
            instance,
        ),
        DomainError::InvalidFields { errors } => {
            let mut resp = from_parts(
                StatusCode::BAD_REQUEST,
                "BIRTHDAYS_VALIDATION",
                "Validation error",
                format!("{} field(s) failed validation", errors.len()),
                instance,
            );
            resp.0 = resp.0.with_errors(
                errors
                    .iter()
                    .map(|fe| ValidationError::new(format!("/{}", fe.field), fe.message.clone()))
                    .collect(),
            );
            resp
        }
        DomainError::Declined { message } => from_parts(
            StatusCode::BAD_REQUEST,
            "BIRTHDAYS_DECLINED",
            "Submission declined",
            message.clone(),
            instance,
        ),
        DomainError::PermissionDenied {
            reason: PermissionReason::NotAuthenticated,
        } => from_parts(
            StatusCode::UNAUTHORIZED,
            "BIRTHDAYS_UNAUTHENTICATED",
            "Authentication required",
            "Login required",
            instance,
        ),
        DomainError::PermissionDenied {
            reason: PermissionReason::NotAuthor,
        } => from_parts(
            StatusCode::FORBIDDEN,
            "BIRTHDAYS_FORBIDDEN",
            "Forbidden",
            "Only the author may change this record",
            instance,
        ),
        DomainError::PersonAlreadyExists { .. } => from_parts(
            StatusCode::CONFLICT,
            "BIRTHDAYS_CONFLICT",
            "Birthday already exists",
            e.to_string(),
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
    }
}

/// Malformed JSON bodies get the same problem shape as domain errors.
pub fn map_json_rejection(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "BIRTHDAYS_BAD_REQUEST",
        "Malformed request body",
        rejection.body_text(),
        instance,
    )
}

pub fn map_path_rejection(rejection: &PathRejection, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "BIRTHDAYS_BAD_REQUEST",
        "Invalid path parameter",
        rejection.body_text(),
        instance,
    )
}
