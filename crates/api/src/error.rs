use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tabula_core::error::CoreError;
use tabula_db::migrate::MigrationError;

use crate::auth::authentication::AuthError;
use crate::auth::session::SessionError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the typed component errors.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tabula_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Credential verification failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No active session for the presented token.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Listing or applying migrations failed.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub name: &'static str,
    pub message: String,
    pub action: String,
    pub status_code: u16,
}

impl AppError {
    /// Collapse into the public error kind the client will see.
    pub fn into_core(self) -> CoreError {
        match self {
            AppError::Core(core) => core,

            AppError::Auth(AuthError::CredentialsMismatch) => CoreError::unauthorized(
                "The authentication data does not match.",
                "Check that the submitted data is correct.",
            ),
            AppError::Session(SessionError::NotFound) => CoreError::unauthorized(
                "User does not have an active session.",
                "Check that this user is logged in and try again.",
            ),

            AppError::Auth(AuthError::Database(err))
            | AppError::Session(SessionError::Database(err))
            | AppError::Database(err) => classify_sqlx_error(err),

            AppError::Auth(AuthError::Hashing(msg)) | AppError::InternalError(msg) => {
                CoreError::Internal(msg)
            }
            AppError::Migration(err) => CoreError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let core = self.into_core();

        if let CoreError::Internal(detail) = &core {
            tracing::error!(error = %detail, "Internal error");
        }

        let status = StatusCode::from_u16(core.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            name: core.name(),
            message: core.public_message(),
            action: core.action().to_string(),
            status_code: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into a public error kind.
///
/// - `RowNotFound` maps to `NotFoundError`.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to `ValidationError`.
/// - Everything else is internal; the detail is logged, not returned.
fn classify_sqlx_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::RowNotFound => {
            CoreError::not_found("The resource was not found.", "Check the request path.")
        }
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            match db_err.constraint() {
                Some(constraint) if constraint.starts_with("uq_") => CoreError::validation(
                    "A submitted value is already in use.",
                    "Use a different value and try again.",
                ),
                _ => CoreError::Internal(err.to_string()),
            }
        }
        _ => CoreError::Internal(err.to_string()),
    }
}
