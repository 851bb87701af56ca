//! Request extractors shared by handlers.
//!
//! - [`auth::AuthSession`] -- Validates and renews the session named by the
//!   `session_id` cookie.

pub mod auth;
