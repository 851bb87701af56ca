//! Route definitions for the `/migrations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{self, migrations};
use crate::state::AppState;

/// ```text
/// GET  /migrations  -> list_pending
/// POST /migrations  -> apply
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/migrations",
        get(migrations::list_pending)
            .post(migrations::apply)
            .fallback(handlers::method_not_allowed),
    )
}
