//! Handlers for the `/migrations` resource.

use axum::extract::State;
use axum::http::StatusCode;
use tabula_db::models::migration::{AppliedMigration, MigrationDescriptor};

use crate::error::AppResult;
use crate::extract::Json;
use crate::state::AppState;

/// GET /api/v1/migrations
///
/// Files not yet recorded in the ledger, in apply order. Writes nothing.
pub async fn list_pending(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MigrationDescriptor>>> {
    let mut conn = state.pool.acquire().await?;
    let pending = state.migrations.list_pending(&mut conn).await?;
    Ok(Json(pending))
}

/// POST /api/v1/migrations
///
/// Applies every pending file. `201` when something ran, `200` otherwise.
pub async fn apply(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<AppliedMigration>>)> {
    let mut conn = state.pool.acquire().await?;
    let applied = state
        .migrations
        .apply(&mut conn, state.clock.as_ref())
        .await?;

    let status = if applied.is_empty() {
        StatusCode::OK
    } else {
        tracing::info!(count = applied.len(), "Migrations applied over HTTP");
        StatusCode::CREATED
    };
    Ok((status, Json(applied)))
}
