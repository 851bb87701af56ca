pub mod migrations;
pub mod sessions;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions                  login, logout
/// /user                      current account (renews the session)
/// /users                     register
/// /users/{username}          read, update
/// /migrations                list pending, apply
/// ```
///
/// Any other method on these paths answers `405 MethodNotAllowedError`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(sessions::router())
        .route(
            "/user",
            get(handlers::user::get).fallback(handlers::method_not_allowed),
        )
        .merge(users::router())
        .merge(migrations::router())
}
