//! Route definitions for the `/sessions` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::{self, sessions};
use crate::state::AppState;

/// ```text
/// POST   /sessions  -> create (login)
/// DELETE /sessions  -> delete (logout)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/sessions",
        post(sessions::create)
            .delete(sessions::delete)
            .fallback(handlers::method_not_allowed),
    )
}
