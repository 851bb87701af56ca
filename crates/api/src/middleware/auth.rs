//! Cookie-based session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tabula_db::models::session::Session;

use crate::auth::cookie::session_token;
use crate::auth::session::SessionError;
use crate::error::AppError;
use crate::state::AppState;

/// Active session resolved from the `session_id` cookie.
///
/// Extraction validates the token and slides its expiry forward, so any
/// handler taking an `AuthSession` renews the session as a side effect:
///
/// ```ignore
/// async fn my_handler(auth: AuthSession) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.session.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The renewed session row.
    pub session: Session,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(SessionError::NotFound)?;
        let session = state.sessions.validate_and_renew(&state.pool, &token).await?;
        Ok(AuthSession { session })
    }
}
