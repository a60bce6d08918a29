use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// A message attached to one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionReason {
    NotAuthenticated,
    NotAuthor,
}

impl fmt::Display for PermissionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => f.write_str("login required"),
            Self::NotAuthor => f.write_str("only the author may change this record"),
        }
    }
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Birthday not found: {id}")]
    BirthdayNotFound { id: Uuid },

    #[error("Invalid fields: {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidFields { errors: Vec<FieldError> },

    /// Whole-submission rejection.
    #[error("{message}")]
    Declined { message: String },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: PermissionReason },

    #[error("Birthday for '{first_name} {last_name}' on {birthday} already exists")]
    PersonAlreadyExists {
        first_name: String,
        last_name: String,
        birthday: chrono::NaiveDate,
    },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn birthday_not_found(id: Uuid) -> Self {
        Self::BirthdayNotFound { id }
    }

    pub fn invalid_fields(errors: Vec<FieldError>) -> Self {
        Self::InvalidFields { errors }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self::Declined {
            message: message.into(),
        }
    }

    pub fn not_authenticated() -> Self {
        Self::PermissionDenied {
            reason: PermissionReason::NotAuthenticated,
        }
    }

    pub fn not_author() -> Self {
        Self::PermissionDenied {
            reason: PermissionReason::NotAuthor,
        }
    }

    pub fn person_already_exists(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthday: chrono::NaiveDate,
    ) -> Self {
        Self::PersonAlreadyExists {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthday,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
