//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{self, users};
use crate::state::AppState;

/// ```text
/// POST  /users             -> create
/// GET   /users/{username}  -> get
/// PATCH /users/{username}  -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            post(users::create).fallback(handlers::method_not_allowed),
        )
        .route(
            "/users/{username}",
            get(users::get)
                .patch(users::update)
                .fallback(handlers::method_not_allowed),
        )
}
