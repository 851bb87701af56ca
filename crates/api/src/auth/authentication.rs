//! Credential verification.
//!
//! An unknown email and a wrong password produce the same
//! [`AuthError::CredentialsMismatch`]; callers must not be able to tell
//! which one happened.

use sqlx::PgPool;
use tabula_db::models::user::User;
use tabula_db::repositories::UserRepo;

use crate::auth::password::SecretHasher;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Credentials do not match")]
    CredentialsMismatch,

    #[error("Password verification error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Find the account for `email` and check `password` against its digest.
///
/// Read-only; issuing a session on success is the caller's job.
pub async fn authenticate(
    pool: &PgPool,
    hasher: &dyn SecretHasher,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let Some(user) = UserRepo::find_by_email(pool, email).await? else {
        tracing::debug!("Login rejected: no account for identifier");
        return Err(AuthError::CredentialsMismatch);
    };

    let matches = hasher
        .compare(password, &user.password_hash)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    if !matches {
        tracing::debug!(user_id = %user.id, "Login rejected: secret mismatch");
        return Err(AuthError::CredentialsMismatch);
    }

    Ok(user)
}
