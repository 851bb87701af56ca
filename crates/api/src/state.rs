use std::sync::Arc;

use tabula_core::clock::Clock;
use tabula_db::migrate::MigrationRunner;

use crate::auth::password::SecretHasher;
use crate::auth::session::SessionStore;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tabula_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Time source for session expiry and record timestamps.
    pub clock: Arc<dyn Clock>,
    /// Password hasher (pepper and cost come from configuration).
    pub hasher: Arc<dyn SecretHasher>,
    pub sessions: SessionStore,
    pub migrations: MigrationRunner,
}

impl AppState {
    /// Wire the components together around a shared clock.
    pub fn new(
        pool: tabula_db::DbPool,
        config: ServerConfig,
        clock: Arc<dyn Clock>,
        hasher: Arc<dyn SecretHasher>,
    ) -> Self {
        let migrations = MigrationRunner::new(config.migrations_dir.clone());
        Self {
            pool,
            sessions: SessionStore::new(Arc::clone(&clock)),
            config: Arc::new(config),
            clock,
            hasher,
            migrations,
        }
    }
}
