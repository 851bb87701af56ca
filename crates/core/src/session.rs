//! Session token generation and sliding-expiration arithmetic.
//!
//! A session is active while `expires_at > now`. Every successful
//! validation pushes `expires_at` to `now + window`; revocation moves it
//! just behind `now` so the row survives for audit but never validates again.

use rand::Rng;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Sliding expiration window in days.
pub const EXPIRATION_WINDOW_DAYS: i64 = 30;

/// Random bytes per token. Rendered as hex, so tokens are twice this long.
pub const TOKEN_BYTES: usize = 48;

/// Length of a rendered token in characters.
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// The sliding expiration window.
pub fn expiration_window() -> chrono::Duration {
    chrono::Duration::days(EXPIRATION_WINDOW_DAYS)
}

/// The expiration window in whole seconds (cookie `Max-Age`).
pub fn expiration_window_secs() -> i64 {
    expiration_window().num_seconds()
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Generate an opaque session token from the thread-local CSPRNG.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// Expiry for a session created or renewed at `now`.
pub fn expires_at_from(now: Timestamp) -> Timestamp {
    now + expiration_window()
}

/// Expiry written on revocation: strictly before `now`.
pub fn revoked_at(now: Timestamp) -> Timestamp {
    now - chrono::Duration::milliseconds(1)
}

pub fn is_active(expires_at: Timestamp, now: Timestamp) -> bool {
    expires_at > now
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[test]
    fn test_token_is_lowercase_hex_of_expected_length() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_window_is_thirty_days() {
        assert_eq!(expiration_window_secs(), 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_expires_at_is_full_window_ahead() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(expires_at_from(now) - now, Duration::days(30));
    }

    #[test]
    fn test_revoked_session_is_inactive() {
        let now = Utc::now();
        let expires_at = revoked_at(now);
        assert!(expires_at < now);
        assert!(!is_active(expires_at, now));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        assert!(!is_active(now, now));
        assert!(is_active(now + Duration::milliseconds(100), now));
    }

    #[test]
    fn test_almost_expired_session_renews_to_full_window() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let expires_at = expires_at_from(created);
        let later = expires_at - Duration::milliseconds(100);

        assert!(is_active(expires_at, later));
        let renewed = expires_at_from(later);
        assert!(renewed > expires_at);
        assert_eq!(renewed - later, expiration_window());
    }
}
