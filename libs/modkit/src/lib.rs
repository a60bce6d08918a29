//! # ModKit
//!
//! Small shared toolkit for Acme REST modules:
//!
//! - [`api::problem`]: RFC 9457 problem documents returned by every handler on failure
//! - [`security`]: the caller identity extracted from the request
//! - [`runtime::shutdown`]: process signal handling for graceful shutdown

pub use anyhow::Result;

pub mod api;
pub mod runtime;
pub mod security;

pub use api::problem::{
    not_found, Problem, ProblemResponse, ValidationError, APPLICATION_PROBLEM_JSON,
};
pub use security::{SecurityCtx, USER_ID_HEADER};
