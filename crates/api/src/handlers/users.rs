//! Handlers for the `/users` resource (register, read, update).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tabula_core::account::{
    duplicate_email, duplicate_username, same_identifier, username_not_found, validation_error,
    AccountWrite,
};
use tabula_core::types::DbId;
use tabula_db::models::user::{CreateUser, UpdateUser, UserResponse};
use tabula_db::repositories::UserRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::state::AppState;

const USERNAME_INDEX: &str = "uq_users_username_lower";
const EMAIL_INDEX: &str = "uq_users_email_lower";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for `PATCH /users/{username}`. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate().map_err(|e| validation_error(&e))?;

    let write = AccountWrite::Register;
    ensure_email_available(&state, &input.email, None, write).await?;
    ensure_username_available(&state, &input.username, None, write).await?;

    let create = CreateUser {
        username: input.username,
        email: input.email,
        password_hash: hash(&state, &input.password)?,
    };
    let user = UserRepo::create(&state.pool, &create, state.clock.now())
        .await
        .map_err(|e| unique_violation(e, write))?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{username}
pub async fn get(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(username_not_found)?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/{username}
///
/// Uniqueness checks skip the account being updated, so a user may change
/// only the casing of their own username or email.
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Option<Json<UpdateUserRequest>>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(username_not_found)?;

    let input = body.map(|Json(b)| b).unwrap_or_default();
    input.validate().map_err(|e| validation_error(&e))?;

    // A value differing from the current one only by case is always free.
    let write = AccountWrite::Update;
    if let Some(email) = input.email.as_deref().filter(|e| !same_identifier(e, &user.email)) {
        ensure_email_available(&state, email, Some(user.id), write).await?;
    }
    if let Some(name) = input
        .username
        .as_deref()
        .filter(|n| !same_identifier(n, &user.username))
    {
        ensure_username_available(&state, name, Some(user.id), write).await?;
    }

    let password_hash = match &input.password {
        Some(password) => Some(hash(&state, password)?),
        None => None,
    };
    let update = UpdateUser {
        username: input.username,
        email: input.email,
        password_hash,
    };

    let updated = UserRepo::update(&state.pool, user.id, &update, state.clock.now())
        .await
        .map_err(|e| unique_violation(e, write))?
        .ok_or_else(username_not_found)?;

    tracing::info!(user_id = %updated.id, "User updated");
    Ok(Json(updated.into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_email_available(
    state: &AppState,
    email: &str,
    exclude: Option<DbId>,
    write: AccountWrite,
) -> AppResult<()> {
    if UserRepo::email_taken(&state.pool, email, exclude).await? {
        return Err(duplicate_email(write).into());
    }
    Ok(())
}

async fn ensure_username_available(
    state: &AppState,
    username: &str,
    exclude: Option<DbId>,
    write: AccountWrite,
) -> AppResult<()> {
    if UserRepo::username_taken(&state.pool, username, exclude).await? {
        return Err(duplicate_username(write).into());
    }
    Ok(())
}

fn hash(state: &AppState, password: &str) -> AppResult<String> {
    state
        .hasher
        .hash(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// A concurrent writer can win the race between the availability check and
/// the write; the unique indexes then reject it.
fn unique_violation(err: sqlx::Error, write: AccountWrite) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some(EMAIL_INDEX) => return duplicate_email(write).into(),
            Some(USERNAME_INDEX) => return duplicate_username(write).into(),
            _ => {}
        }
    }
    AppError::Database(err)
}
