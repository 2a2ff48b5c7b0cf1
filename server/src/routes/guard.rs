//! Page guard: bounce signed-out visitors away from member-only pages.
//!
//! A visitor counts as signed in when either auth cookie is present. An
//! expired access token with a live refresh token is still a session; the
//! client refreshes it on its first API call.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::services::cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, token_from};

pub const LOGIN_PATH: &str = "/login";

/// Member-only pages: `/activity/new`, `/activity/{id}/edit`, `/mypage[/*]`.
#[must_use]
pub fn is_protected(path: &str) -> bool {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["activity", "new"] | ["activity", _, "edit"] => true,
        ["mypage", ..] => true,
        _ => false,
    }
}

/// `/login?redirect=<path-and-query>` with the target percent-encoded.
#[must_use]
pub fn login_redirect(path_and_query: &str) -> String {
    let mut url = match reqwest::Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(_) => return LOGIN_PATH.to_owned(),
    };
    url.set_path(LOGIN_PATH);
    url.query_pairs_mut().append_pair("redirect", path_and_query);
    match url.query() {
        Some(query) => format!("{LOGIN_PATH}?{query}"),
        None => LOGIN_PATH.to_owned(),
    }
}

pub async fn require_session(req: Request, next: Next) -> Response {
    if !is_protected(req.uri().path()) {
        return next.run(req).await;
    }

    let jar = CookieJar::from_headers(req.headers());
    let signed_in = token_from(&jar, ACCESS_TOKEN_COOKIE).is_some() || token_from(&jar, REFRESH_TOKEN_COOKIE).is_some();
    if signed_in {
        return next.run(req).await;
    }

    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_owned(), |pq| pq.as_str().to_owned());
    tracing::debug!(%target, "redirecting signed-out visitor to login");
    Redirect::temporary(&login_redirect(&target)).into_response()
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
