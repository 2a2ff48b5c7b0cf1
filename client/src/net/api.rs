//! Credentialed fetch wrapper for the BFF's `/api/*` routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Tokens live in `HttpOnly` cookies the BFF sets, so this client only needs a
//! cookie store. When an access token expires mid-session the BFF answers 401;
//! the client then refreshes once (shared by every caller that hit the same
//! 401) and retries the original request exactly once.
//!
//! ERROR HANDLING
//! ==============
//! A failed refresh surfaces the original request's error, not the refresh's.
//! A 401 from the refresh itself means the session is over, so the session
//! store is cleared as a side effect.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::abort::AbortSignal;
use super::error::ClientError;
use super::refresh::SingleFlight;
use super::types::{
    KakaoSignInRequest, KakaoSignUpRequest, LoginRequest, RefreshResponse, SessionResponse, UserInfo,
};
use crate::state::session::SessionStore;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const AUTH_PREFIX: &str = "/api/auth";
const LOGIN_ENDPOINT: &str = "/api/auth/login";
const LOGOUT_ENDPOINT: &str = "/api/auth/logout";
const REFRESH_ENDPOINT: &str = "/api/auth/tokens";
const ME_ENDPOINT: &str = "/api/users/me";
const KAKAO_SIGN_IN_ENDPOINT: &str = "/api/oauth/sign-in/kakao";
const KAKAO_SIGN_UP_ENDPOINT: &str = "/api/oauth/sign-up/kakao";

/// Auth endpoints never trigger a refresh; a 401 there is final.
fn is_auth_endpoint(endpoint: &str) -> bool {
    let path = endpoint.split(['?', '#']).next().unwrap_or_default();
    path == AUTH_PREFIX || path.starts_with("/api/auth/")
}

#[derive(Clone, Debug)]
pub enum RequestBody {
    Json(Value),
    Text(String),
    Bytes { content_type: String, bytes: Vec<u8> },
}

/// Per-call options. Bodies are kept by value so a retry can resend them.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<RequestBody>,
    pub headers: HeaderMap,
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
    pub signal: Option<AbortSignal>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    #[must_use]
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// Cheap to clone; clones share the cookie jar and the refresh flight.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    session: Arc<SessionStore>,
    refresh: Arc<SingleFlight<Result<RefreshResponse, ClientError>>>,
}

impl ApiClient {
    /// Client for the BFF at `base_url` (the site origin).
    ///
    /// # Errors
    ///
    /// `InvalidUrl` when `base_url` does not parse, `HttpClientBuild` when the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, timeout: DEFAULT_TIMEOUT, session, refresh: Arc::new(SingleFlight::new()) })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url_for(&self, endpoint: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| ClientError::InvalidUrl(format!("{endpoint}: {e}")))
    }

    /// Issue `endpoint`, refreshing and retrying once on a 401.
    ///
    /// # Errors
    ///
    /// `Http` for a non-2xx answer (the original 401 if the refresh fails),
    /// `Network`, `Timeout` or `Aborted` when the call does not complete,
    /// `InvalidUrl` for an unjoinable endpoint and `Decode` for a malformed body.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ClientError> {
        match self.send(endpoint, &options).await {
            Err(err) if err.is_unauthorized() && !is_auth_endpoint(endpoint) => {
                tracing::debug!(%endpoint, "access token rejected; refreshing");
                if let Err(refresh_err) = self.refresh_tokens().await {
                    tracing::debug!(%endpoint, error = %refresh_err, "refresh failed; giving up");
                    return Err(err);
                }
                self.send(endpoint, &options).await
            }
            other => other,
        }
    }

    /// [`Self::request`], decoding the body into `T`.
    ///
    /// # Errors
    ///
    /// As [`Self::request`], plus `Decode` when the body does not fit `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let value = self.request(endpoint, options).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Rotate the token pair. Concurrent callers share one upstream call.
    ///
    /// # Errors
    ///
    /// The shared refresh outcome; a 401 also clears the session.
    pub async fn refresh_tokens(&self) -> Result<RefreshResponse, ClientError> {
        let url = self.url_for(REFRESH_ENDPOINT)?;
        let http = self.http.clone();
        let session = self.session.clone();
        let timeout = self.timeout;

        self.refresh
            .run(move || async move {
                let result = async {
                    let send = http.post(url).send();
                    let response = tokio::time::timeout(timeout, send)
                        .await
                        .map_err(|_| ClientError::Timeout)?
                        .map_err(|e| ClientError::from_reqwest(&e))?;
                    let value = read_response(response).await?;
                    serde_json::from_value::<RefreshResponse>(value).map_err(|e| ClientError::Decode(e.to_string()))
                }
                .await;

                match &result {
                    Ok(refreshed) => session.set_access_token_expiry(refreshed.access_token_expires_at),
                    Err(err) if err.is_unauthorized() => {
                        tracing::info!("refresh token rejected; clearing session");
                        session.clear();
                    }
                    Err(err) => tracing::warn!(error = %err, "token refresh failed"),
                }
                result
            })
            .await
    }

    /// Email/password sign-in; stores the user in the session.
    ///
    /// # Errors
    ///
    /// As [`Self::request_json`]; a rejected login surfaces as `Http`.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo, ClientError> {
        let body = to_json(&LoginRequest { email, password })?;
        self.sign_in(LOGIN_ENDPOINT, body).await
    }

    /// Sign in with a Kakao authorization code.
    ///
    /// # Errors
    ///
    /// As [`Self::request_json`]; an unregistered Kakao account surfaces as `Http`.
    pub async fn kakao_sign_in(&self, code: &str) -> Result<UserInfo, ClientError> {
        let body = to_json(&KakaoSignInRequest { code })?;
        self.sign_in(KAKAO_SIGN_IN_ENDPOINT, body).await
    }

    /// Register with a Kakao authorization code and nickname.
    ///
    /// # Errors
    ///
    /// As [`Self::request_json`].
    pub async fn kakao_sign_up(&self, code: &str, nickname: &str) -> Result<UserInfo, ClientError> {
        let body = to_json(&KakaoSignUpRequest { code, nickname })?;
        self.sign_in(KAKAO_SIGN_UP_ENDPOINT, body).await
    }

    async fn sign_in(&self, endpoint: &str, body: Value) -> Result<UserInfo, ClientError> {
        let signed_in: SessionResponse = self.request_json(endpoint, RequestOptions::post().with_json(body)).await?;
        self.session.sign_in(signed_in.user.clone(), signed_in.access_token_expires_at);
        Ok(signed_in.user)
    }

    /// Drop the cookie session. The local session is cleared even if the call fails.
    ///
    /// # Errors
    ///
    /// As [`Self::request`].
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.request(LOGOUT_ENDPOINT, RequestOptions::post()).await;
        self.session.clear();
        result.map(|_| ())
    }

    /// Fetch the signed-in user and store it in the session.
    ///
    /// # Errors
    ///
    /// As [`Self::request_json`]; `Http` with status 401 when nobody is signed in.
    pub async fn fetch_me(&self) -> Result<UserInfo, ClientError> {
        let user: UserInfo = self.request_json(ME_ENDPOINT, RequestOptions::get()).await?;
        self.session.set_user(user.clone());
        Ok(user)
    }

    /// One attempt: build, send under timeout/abort, read the body.
    async fn send(&self, endpoint: &str, options: &RequestOptions) -> Result<Value, ClientError> {
        let url = self.url_for(endpoint)?;
        let mut headers = options.headers.clone();
        if matches!(options.body, Some(RequestBody::Bytes { .. })) {
            // The body's own type carries the multipart boundary; it replaces any caller value.
            headers.remove(CONTENT_TYPE);
        }
        let mut builder = self.http.request(options.method.clone(), url).headers(headers);
        builder = match &options.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Text(text)) => {
                if !options.headers.contains_key(CONTENT_TYPE) {
                    builder = builder.header(CONTENT_TYPE, "text/plain; charset=utf-8");
                }
                builder.body(text.clone())
            }
            Some(RequestBody::Bytes { content_type, bytes }) => {
                builder.header(CONTENT_TYPE, content_type.as_str()).body(bytes.clone())
            }
        };

        let attempt = async {
            let response = builder.send().await.map_err(|e| ClientError::from_reqwest(&e))?;
            read_response(response).await
        };
        let timed = tokio::time::timeout(options.timeout.unwrap_or(self.timeout), attempt);

        let outcome = match &options.signal {
            Some(signal) => {
                tokio::select! {
                    biased;
                    () = signal.aborted() => return Err(ClientError::Aborted),
                    outcome = timed => outcome,
                }
            }
            None => timed.await,
        };
        let result = outcome.unwrap_or(Err(ClientError::Timeout));
        if let Err(err) = &result {
            tracing::debug!(%endpoint, method = %options.method, error = %err, "api request failed");
        }
        result
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Turn a response into JSON: error envelope on non-2xx, `Null` for an empty body.
async fn read_response(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| ClientError::from_reqwest(&e))?;
    if !status.is_success() {
        return Err(ClientError::from_response(status, &bytes));
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
