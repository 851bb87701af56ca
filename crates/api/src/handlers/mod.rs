//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the auth components or the repositories in
//! `tabula_db` and map errors via [`AppError`](crate::error::AppError).

pub mod migrations;
pub mod sessions;
pub mod user;
pub mod users;

use tabula_core::error::CoreError;

use crate::error::AppError;

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::Core(CoreError::MethodNotAllowed)
}
