//! Handler for `/user`, the account owning the current session.

use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, SET_COOKIE};
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use tabula_db::models::user::UserResponse;
use tabula_db::repositories::UserRepo;

use crate::auth::cookie::session_cookie;
use crate::auth::session::SessionError;
use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthSession;
use crate::state::AppState;

const NO_STORE: &str = "no-store, no-cache, max-age=0, must-revalidate";

/// GET /api/v1/user
///
/// The session was renewed during extraction; re-send the cookie so the
/// client's copy lives as long as the row.
pub async fn get(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<impl IntoResponse> {
    // The FK keeps this from happening short of a manual delete.
    let user = UserRepo::find_by_id(&state.pool, auth.session.user_id)
        .await?
        .ok_or(SessionError::NotFound)?;

    let cookie = session_cookie(&auth.session.token, state.config.secure_cookies());

    Ok((
        [(SET_COOKIE, cookie), (CACHE_CONTROL, HeaderValue::from_static(NO_STORE))],
        Json(UserResponse::from(user)),
    ))
}
