use thiserror::Error;
use uuid::Uuid;

use crate::domain::error::{DomainError, PermissionReason};

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BirthdaysError {
    #[error("Birthday not found: {id}")]
    NotFound { id: Uuid },

    #[error("Birthday for this person already exists")]
    Conflict,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{message}")]
    Declined { message: String },

    #[error("Only the author may change this record")]
    Forbidden,

    #[error("Login required")]
    Unauthenticated,

    #[error("Internal error")]
    Internal,
}

impl BirthdaysError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<DomainError> for BirthdaysError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::BirthdayNotFound { id } => Self::not_found(id),
            DomainError::PersonAlreadyExists { .. } => Self::Conflict,
            DomainError::InvalidFields { errors } => Self::validation(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            DomainError::Declined { message } => Self::Declined { message },
            DomainError::PermissionDenied {
                reason: PermissionReason::NotAuthenticated,
            } => Self::Unauthenticated,
            DomainError::PermissionDenied {
                reason: PermissionReason::NotAuthor,
            } => Self::Forbidden,
            DomainError::Database { .. } => Self::internal(),
        }
    }
}
