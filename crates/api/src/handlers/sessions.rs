//! Handlers for the `/sessions` resource (login, logout).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::auth::authentication::authenticate;
use crate::auth::cookie::{cleared_session_cookie, session_cookie, session_token};
use crate::auth::session::SessionError;
use crate::error::AppResult;
use crate::extract::Json;
use crate::state::AppState;

/// Request body for `POST /sessions`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/sessions
///
/// Verify credentials, issue a session, and hand its token back in the
/// `session_id` cookie.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = authenticate(
        &state.pool,
        state.hasher.as_ref(),
        &input.email,
        &input.password,
    )
    .await?;

    let session = state.sessions.create(&state.pool, user.id).await?;
    let cookie = session_cookie(&session.token, state.config.secure_cookies());

    Ok((StatusCode::CREATED, [(SET_COOKIE, cookie)], Json(session)))
}

/// DELETE /api/v1/sessions
///
/// Revoke the session named by the cookie and tell the client to drop it.
pub async fn delete(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> AppResult<impl IntoResponse> {
    let token = session_token(&headers).ok_or(SessionError::NotFound)?;
    let session = state.sessions.revoke(&state.pool, &token).await?;
    let cookie = cleared_session_cookie(state.config.secure_cookies());

    Ok(([(SET_COOKIE, cookie)], Json(session)))
}
