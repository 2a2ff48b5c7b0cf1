//! Shared helpers for HTTP-level tests: ephemeral servers, config, tokens.

use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;

use crate::config::Config;
use crate::services::jwt;
use crate::state::AppState;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });
    format!("http://{addr}")
}

#[must_use]
pub fn test_config(api_url: &str) -> Config {
    Config {
        api_url: api_url.to_owned(),
        port: 0,
        static_dir: PathBuf::from("/nonexistent-nomad-static"),
        cookie_secure: false,
        upstream_timeout: Duration::from_millis(500),
        kakao: None,
    }
}

#[must_use]
pub fn test_state(api_url: &str) -> AppState {
    AppState::new(test_config(api_url)).expect("test state")
}

/// Spawn the full BFF router in front of `upstream`.
pub async fn spawn_bff(config: Config) -> String {
    let state = AppState::new(config).expect("test state");
    spawn(crate::routes::app(state)).await
}

/// HS256 token whose `exp` is `secs` from now (negative for already expired).
#[must_use]
pub fn jwt_expiring_in(secs: i64) -> String {
    jwt_with_claims(&json!({ "id": 7, "exp": jwt::now_secs() + secs }))
}

#[must_use]
pub fn jwt_with_claims(claims: &serde_json::Value) -> String {
    jsonwebtoken::encode(&Header::default(), claims, &EncodingKey::from_secret(b"test-secret")).expect("encode jwt")
}

/// Client that does not follow redirects, so tests can see `Location`.
#[must_use]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

/// All `Set-Cookie` header values on a response.
#[must_use]
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_owned))
        .collect()
}

/// The `Set-Cookie` value for cookie `name`, if any.
#[must_use]
pub fn set_cookie_for(response: &reqwest::Response, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    set_cookies(response).into_iter().find(|c| c.starts_with(&prefix))
}
