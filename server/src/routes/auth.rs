//! Auth routes: credential login, logout, token rotation.
//!
//! Tokens only ever travel between the BFF and the upstream. The browser gets
//! them as HttpOnly cookies and sees nothing but the user payload and the
//! access token's expiry.

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::authed::ProxyRequest;
use crate::error::{BffError, LOGOUT_MESSAGE};
use crate::services::cookies::{self, REFRESH_TOKEN_COOKIE, TokenPair};
use crate::services::jwt;
use crate::services::proxy::{self, ProxyOptions};
use crate::services::upstream::UpstreamError;
use crate::state::AppState;

/// Upstream response to any sign-in style call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInResponse {
    user: Value,
    access_token: String,
    refresh_token: String,
}

/// What the browser receives after signing in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub user: Value,
    pub access_token_expires_at: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPayload {
    pub access_token_expires_at: Option<i64>,
}

/// Turn an upstream sign-in response into cookies plus the browser payload.
pub(crate) fn establish_session(
    state: &AppState,
    jar: CookieJar,
    upstream: Value,
) -> Result<(CookieJar, Json<SessionPayload>), BffError> {
    let signed_in: SignInResponse =
        serde_json::from_value(upstream).map_err(|e| UpstreamError::Decode(e.to_string()))?;
    let access_token_expires_at = jwt::expires_at_ms(&signed_in.access_token);
    let tokens = TokenPair { access_token: signed_in.access_token, refresh_token: signed_in.refresh_token };
    let jar = cookies::with_auth_cookies(jar, tokens, state.cookie_secure());
    Ok((jar, Json(SessionPayload { user: signed_in.user, access_token_expires_at })))
}

/// `POST /api/auth/login`: exchange credentials for a cookie session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    req: ProxyRequest,
) -> Result<(CookieJar, Json<SessionPayload>), BffError> {
    let options = ProxyOptions::new(Method::POST).with_body(req.body);
    let upstream = proxy::forward(&state.upstream, "/auth/login", options, None).await?;
    let session = establish_session(&state, jar, upstream)?;
    tracing::info!("login succeeded");
    Ok(session)
}

/// `POST /api/auth/logout`: drop both auth cookies. Works without a session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = cookies::without_auth_cookies(jar, state.cookie_secure());
    (jar, Json(json!({ "message": LOGOUT_MESSAGE }))).into_response()
}

/// `POST /api/auth/tokens`: rotate the token pair using the refresh cookie.
///
/// An upstream 401 means the refresh token is dead; the cookies are cleared
/// along with the error so the browser stops retrying with them.
pub async fn refresh_tokens(State(state): State<AppState>, jar: CookieJar) -> Response {
    let secure = state.cookie_secure();
    let Some(refresh_token) = cookies::token_from(&jar, REFRESH_TOKEN_COOKIE) else {
        return BffError::MissingToken.into_response();
    };

    let result =
        proxy::forward(&state.upstream, "/auth/tokens", ProxyOptions::new(Method::POST), Some(&refresh_token)).await;

    match result.and_then(|value| {
        serde_json::from_value::<TokenPair>(value).map_err(|e| UpstreamError::Decode(e.to_string()))
    }) {
        Ok(tokens) => {
            let access_token_expires_at = jwt::expires_at_ms(&tokens.access_token);
            let jar = cookies::with_auth_cookies(jar, tokens, secure);
            (jar, Json(RefreshPayload { access_token_expires_at })).into_response()
        }
        Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED.as_u16()) => {
            tracing::info!("refresh token rejected; clearing session cookies");
            (cookies::without_auth_cookies(jar, secure), BffError::from(err)).into_response()
        }
        Err(err) => BffError::from(err).into_response(),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
