//! The `session_id` cookie.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use tabula_core::session::expiration_window_secs;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// Value written over the token on logout.
pub const CLEARED_COOKIE_VALUE: &str = "invalid";

/// `Set-Cookie` value carrying `token` for a full expiration window.
pub fn session_cookie(token: &str, secure: bool) -> HeaderValue {
    build(token, expiration_window_secs(), secure)
}

/// `Set-Cookie` value that makes the client drop the session cookie.
pub fn cleared_session_cookie(secure: bool) -> HeaderValue {
    build(CLEARED_COOKIE_VALUE, -1, secure)
}

fn build(value: &str, max_age: i64, secure: bool) -> HeaderValue {
    let mut cookie = format!("{SESSION_COOKIE_NAME}={value}; Max-Age={max_age}; Path=/; HttpOnly");
    if secure {
        cookie.push_str("; Secure");
    }
    // Tokens are hex, so the header is always visible ASCII.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static("session_id=invalid"))
}

/// Read the session token from the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
