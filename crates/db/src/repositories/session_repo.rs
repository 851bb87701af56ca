//! Repository for the `sessions` table.
//!
//! Sessions are never deleted. Expiry moves forward on renewal and into
//! the past on revocation; both happen in a single conditional `UPDATE`
//! so an expired row can never be revived.

use sqlx::PgPool;
use tabula_core::types::{DbId, Timestamp};

use crate::models::session::{CreateSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token, user_id, expires_at, created_at, updated_at";

/// Provides persistence operations for login sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (token, user_id, expires_at, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(&input.token)
            .bind(input.user_id)
            .bind(input.expires_at)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by exact token, only if it is still active at `now`.
    pub async fn find_active_by_token(
        pool: &PgPool,
        token: &str,
        now: Timestamp,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE token = $1
               AND expires_at > $2"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(token)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Set a new expiry on the session holding `token`, if it is active at `now`.
    ///
    /// Also stamps `updated_at = now`. Returns `None` when no active session
    /// matches, whether the token never existed, expired, or was revoked.
    pub async fn update_expiry_if_active(
        pool: &PgPool,
        token: &str,
        now: Timestamp,
        expires_at: Timestamp,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET
                expires_at = $3,
                updated_at = $2
             WHERE token = $1
               AND expires_at > $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(token)
            .bind(now)
            .bind(expires_at)
            .fetch_optional(pool)
            .await
    }

    /// List all sessions (active or not) belonging to a user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
