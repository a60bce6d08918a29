//! Caller identity.
//!
//! Authentication itself happens upstream; this service only reads the
//! already-established user id from the `x-user-id` header. A missing or
//! malformed header yields an anonymous context rather than a rejection, so
//! read-only routes stay public and write routes decide on their own.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityCtx {
    subject: Option<Uuid>,
}

impl SecurityCtx {
    pub fn anonymous() -> Self {
        Self { subject: None }
    }

    pub fn for_subject(subject: Uuid) -> Self {
        Self {
            subject: Some(subject),
        }
    }

    pub fn subject(&self) -> Option<Uuid> {
        self.subject
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    fn from_parts(parts: &Parts) -> Self {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(Self::for_subject)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for SecurityCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let ctx = Self::from_parts(parts);
        async move { Ok(ctx) }
    }
}
