//! Kakao OAuth routes.

use axum::extract::{Query, State};
use axum::http::Method;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use super::auth::{SessionPayload, establish_session};
use super::authed::ProxyRequest;
use crate::config::KakaoConfig;
use crate::error::{BffError, OAUTH_UNAVAILABLE_MESSAGE};
use crate::services::proxy::{self, ProxyOptions};
use crate::state::AppState;

/// Which flow the Kakao round-trip should land in, echoed back via `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthMode {
    Signin,
    Signup,
}

impl OAuthMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signin => "signin",
            Self::Signup => "signup",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    mode: Option<OAuthMode>,
}

#[derive(Debug, Deserialize)]
pub struct KakaoSignInBody {
    code: String,
}

#[derive(Debug, Deserialize)]
pub struct KakaoSignUpBody {
    code: String,
    nickname: String,
}

fn kakao_config(state: &AppState) -> Result<&KakaoConfig, BffError> {
    state
        .config
        .kakao
        .as_ref()
        .ok_or(BffError::Unavailable(OAUTH_UNAVAILABLE_MESSAGE))
}

/// `GET /api/oauth/kakao/authorize?mode=signin|signup`: redirect to Kakao.
pub async fn kakao_authorize(State(state): State<AppState>, Query(query): Query<AuthorizeQuery>) -> Response {
    let kakao = match kakao_config(&state) {
        Ok(kakao) => kakao,
        Err(err) => return err.into_response(),
    };
    let mode = query.mode.unwrap_or(OAuthMode::Signin);
    match kakao.authorize_url(mode.as_str()) {
        Some(url) => Redirect::temporary(&url).into_response(),
        None => BffError::Internal("could not build kakao authorize url".into()).into_response(),
    }
}

/// `POST /api/oauth/sign-in/kakao`: finish a Kakao sign-in with the auth code.
pub async fn kakao_sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    req: ProxyRequest,
) -> Result<(CookieJar, Json<SessionPayload>), BffError> {
    let kakao = kakao_config(&state)?;
    let body: KakaoSignInBody = req.json()?;
    let payload = json!({ "redirectUri": kakao.redirect_uri, "token": body.code });

    let options = ProxyOptions::new(Method::POST).with_json(payload);
    let upstream = proxy::forward(&state.upstream, "/oauth/sign-in/kakao", options, None).await?;
    establish_session(&state, jar, upstream)
}

/// `POST /api/oauth/sign-up/kakao`: register through Kakao with a nickname.
pub async fn kakao_sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    req: ProxyRequest,
) -> Result<(CookieJar, Json<SessionPayload>), BffError> {
    let kakao = kakao_config(&state)?;
    let body: KakaoSignUpBody = req.json()?;
    let payload = json!({ "nickname": body.nickname, "redirectUri": kakao.redirect_uri, "token": body.code });

    let options = ProxyOptions::new(Method::POST).with_json(payload);
    let upstream = proxy::forward(&state.upstream, "/oauth/sign-up/kakao", options, None).await?;
    let session = establish_session(&state, jar, upstream)?;
    tracing::info!("kakao sign-up completed");
    Ok(session)
}

#[cfg(test)]
#[path = "oauth_test.rs"]
mod tests;
