//! # Session Cookie Helpers
//!
//! Tokens travel both in JSON bodies and as `HttpOnly; Secure` cookies so
//! browser clients never expose them to page scripts. These helpers build
//! `Set-Cookie` values and read the `Cookie` request header; nothing here
//! inspects token contents.

use axum::http::{header::COOKIE, HeaderMap};

/// Cookie name for the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Cookie name for the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Build a `Set-Cookie` value for a session token.
pub fn session_cookie(name: &str, value: &str, max_age_seconds: i64) -> String {
    format!("{name}={value}; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age={max_age_seconds}")
}

/// Build a `Set-Cookie` value that removes a session cookie.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age=0")
}

/// Extract a cookie value from the request headers, if present.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}
