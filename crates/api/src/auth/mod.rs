//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`authentication`] -- Credential verification for login.
//! - [`session`] -- Session issuance, sliding renewal, and revocation.
//! - [`cookie`] -- The `session_id` cookie carried between requests.

pub mod authentication;
pub mod cookie;
pub mod password;
pub mod session;
