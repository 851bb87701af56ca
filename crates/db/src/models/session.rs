//! Login session model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tabula_core::types::{DbId, Timestamp};

/// A session row from the `sessions` table.
///
/// Serialized as-is: the token is handed to its owner on login and logout.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub token: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Session {
    pub fn is_active(&self, now: Timestamp) -> bool {
        tabula_core::session::is_active(self.expires_at, now)
    }
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    /// Written to both `created_at` and `updated_at`.
    pub created_at: Timestamp,
}
