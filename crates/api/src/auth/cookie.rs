//! Session cookie helpers.
//!
//! The JWT is transported in an HTTP-only cookie so the browser client
//! never handles the token directly. The same token is also accepted as
//! a Bearer header for non-browser clients; see `middleware::auth`.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Build the `Set-Cookie` value that establishes a session.
pub fn session_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
    format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Build the `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session token from a request's `Cookie` header, if present.
pub fn token_from_cookies(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(cookie_name)?.strip_prefix('='))
        .map(str::to_string)
}
