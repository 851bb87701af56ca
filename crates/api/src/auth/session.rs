//! Session store: issue, validate-and-renew, revoke.
//!
//! Every read through [`SessionStore::validate_and_renew`] pushes the
//! expiry a full window past the current time. Revocation only moves the
//! expiry into the past; rows are kept.

use std::sync::Arc;

use sqlx::PgPool;
use tabula_core::clock::Clock;
use tabula_core::session::{expires_at_from, generate_token, revoked_at};
use tabula_core::types::DbId;
use tabula_db::models::session::{CreateSession, Session};
use tabula_db::repositories::SessionRepo;

/// Failure to find an active session.
///
/// `NotFound` deliberately covers unknown, expired, and revoked tokens alike.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No active session")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Issue a fresh session for `user_id`.
    pub async fn create(&self, pool: &PgPool, user_id: DbId) -> Result<Session, sqlx::Error> {
        let now = self.clock.now();
        let input = CreateSession {
            user_id,
            token: generate_token(),
            expires_at: expires_at_from(now),
            created_at: now,
        };
        let session = SessionRepo::create(pool, &input).await?;
        tracing::info!(session_id = %session.id, user_id = %user_id, "Session created");
        Ok(session)
    }

    /// Validate `token` and slide its expiry forward by a full window.
    pub async fn validate_and_renew(
        &self,
        pool: &PgPool,
        token: &str,
    ) -> Result<Session, SessionError> {
        let now = self.clock.now();
        SessionRepo::update_expiry_if_active(pool, token, now, expires_at_from(now))
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Expire the session holding `token` immediately.
    ///
    /// Returns the now-expired row.
    pub async fn revoke(&self, pool: &PgPool, token: &str) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let session = SessionRepo::update_expiry_if_active(pool, token, now, revoked_at(now))
            .await?
            .ok_or(SessionError::NotFound)?;
        tracing::info!(session_id = %session.id, user_id = %session.user_id, "Session revoked");
        Ok(session)
    }
}
