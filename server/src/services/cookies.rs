//! Auth cookie construction.
//!
//! Every route that establishes, rotates or ends a session goes through these
//! helpers, so both cookies always carry the same attributes: HttpOnly,
//! `SameSite=Lax`, path `/`, `Secure` when configured, and a max-age taken
//! from the token's own `exp`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use super::jwt;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Token pair as issued by the upstream auth endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Build one auth cookie. Tokens without a readable `exp` become session cookies.
#[must_use]
pub fn auth_cookie(name: &'static str, token: String, secure: bool, now: i64) -> Cookie<'static> {
    let max_age = jwt::max_age_secs(&token, now);
    let mut builder = Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    if let Some(secs) = max_age {
        builder = builder.max_age(Duration::seconds(secs));
    }
    builder.build()
}

/// An already-expired cookie that makes the browser drop `name`.
#[must_use]
pub fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

#[must_use]
pub fn with_auth_cookies(jar: CookieJar, tokens: TokenPair, secure: bool) -> CookieJar {
    let now = jwt::now_secs();
    jar.add(auth_cookie(ACCESS_TOKEN_COOKIE, tokens.access_token, secure, now))
        .add(auth_cookie(REFRESH_TOKEN_COOKIE, tokens.refresh_token, secure, now))
}

#[must_use]
pub fn without_auth_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(expired_cookie(ACCESS_TOKEN_COOKIE, secure))
        .add(expired_cookie(REFRESH_TOKEN_COOKIE, secure))
}

/// Non-empty value of cookie `name`.
#[must_use]
pub fn token_from(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "cookies_test.rs"]
mod tests;
