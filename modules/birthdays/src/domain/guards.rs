use modkit::SecurityCtx;
use uuid::Uuid;

use crate::contract::model::Birthday;
use crate::domain::error::DomainError;

/// The caller's id, or `NotAuthenticated`.
pub fn require_login(ctx: &SecurityCtx) -> Result<Uuid, DomainError> {
    ctx.subject().ok_or_else(DomainError::not_authenticated)
}

/// Login first, then authorship of `birthday`.
pub fn ensure_author(ctx: &SecurityCtx, birthday: &Birthday) -> Result<Uuid, DomainError> {
    let user = require_login(ctx)?;
    if user == birthday.author {
        Ok(user)
    } else {
        Err(DomainError::not_author())
    }
}
