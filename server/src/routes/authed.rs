//! Request extraction for proxying routes, with and without required auth.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every `/api/*` handler that talks to the upstream takes one of these
//! extractors. `AuthedRequest` rejects a missing `accessToken` cookie with a
//! 401 before the body is even read; `ProxyRequest` carries the token when it
//! happens to be there. Both normalize the body the same way:
//!
//! - `GET` / `HEAD` / `DELETE`: no body
//! - `multipart/form-data`: raw bytes with the boundary-bearing content type
//! - `text/plain`: the text as-is
//! - anything else: JSON, where an empty body means "no body"
//!
//! [`authenticated`] and [`respond`] close the loop, turning handler output
//! into a JSON response and errors into `{"message"}` bodies.

use std::future::Future;

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BffError;
use crate::services::cookies::{ACCESS_TOKEN_COOKIE, token_from};
use crate::services::proxy::{ProxyBody, ProxyOptions};

/// Upper bound on buffered request bodies (image uploads included).
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// A request whose access token is optional.
#[derive(Debug)]
pub struct ProxyRequest {
    pub access_token: Option<String>,
    pub body: Option<ProxyBody>,
    pub parts: Parts,
}

/// A request that carried an `accessToken` cookie.
#[derive(Debug)]
pub struct AuthedRequest {
    pub access_token: String,
    pub body: Option<ProxyBody>,
    pub parts: Parts,
}

impl<S> FromRequest<S> for ProxyRequest
where
    S: Send + Sync,
{
    type Rejection = BffError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let access_token = access_token(&parts.headers);
        let body = read_body(&parts, body).await?;
        Ok(Self { access_token, body, parts })
    }
}

impl<S> FromRequest<S> for AuthedRequest
where
    S: Send + Sync,
{
    type Rejection = BffError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let access_token = access_token(&parts.headers).ok_or(BffError::MissingToken)?;
        let body = read_body(&parts, body).await?;
        Ok(Self { access_token, body, parts })
    }
}

impl ProxyRequest {
    /// Deserialize the JSON body into `T`. A missing body is treated as `{}`.
    ///
    /// # Errors
    ///
    /// `BadRequest` if the body is not JSON or does not fit `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BffError> {
        let value = match &self.body {
            Some(ProxyBody::Json(value)) => value.clone(),
            None => serde_json::Value::Object(serde_json::Map::new()),
            Some(_) => return Err(BffError::BadRequest("expected a JSON body".into())),
        };
        serde_json::from_value(value).map_err(|e| BffError::BadRequest(e.to_string()))
    }

    /// Upstream endpoint mirroring this request's path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        upstream_endpoint(self.parts.uri.path())
    }

    /// Forwarding options carrying method, body and query string.
    #[must_use]
    pub fn proxy_options(&self) -> ProxyOptions {
        proxy_options(&self.parts, self.body.clone())
    }
}

impl AuthedRequest {
    #[must_use]
    pub fn endpoint(&self) -> &str {
        upstream_endpoint(self.parts.uri.path())
    }

    #[must_use]
    pub fn proxy_options(&self) -> ProxyOptions {
        proxy_options(&self.parts, self.body.clone())
    }
}

/// Strip the BFF's `/api` prefix: `/api/my-activities/3` → `/my-activities/3`.
#[must_use]
pub fn upstream_endpoint(path: &str) -> &str {
    path.strip_prefix("/api")
        .filter(|rest| rest.starts_with('/'))
        .unwrap_or(path)
}

fn proxy_options(parts: &Parts, body: Option<ProxyBody>) -> ProxyOptions {
    ProxyOptions::new(parts.method.clone())
        .with_body(body)
        .with_query(parts.uri.query())
}

fn access_token(headers: &HeaderMap) -> Option<String> {
    token_from(&CookieJar::from_headers(headers), ACCESS_TOKEN_COOKIE)
}

async fn read_body(parts: &Parts, body: Body) -> Result<Option<ProxyBody>, BffError> {
    if !method_has_body(&parts.method) {
        return Ok(None);
    }
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| BffError::BadRequest(e.to_string()))?;
    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    parse_body(&parts.method, content_type, bytes)
}

fn method_has_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::DELETE)
}

fn has_media_type(content_type: &str, media_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with(media_type)
}

/// Normalize a raw request body by method and content type.
///
/// # Errors
///
/// `BadRequest` when a body is not UTF-8 (multipart excepted), or when a
/// non-empty body that is neither multipart nor `text/plain` is not valid JSON.
pub fn parse_body(method: &Method, content_type: Option<&str>, bytes: Bytes) -> Result<Option<ProxyBody>, BffError> {
    if !method_has_body(method) {
        return Ok(None);
    }
    if let Some(content_type) = content_type.filter(|ct| has_media_type(ct, "multipart/form-data")) {
        return Ok(Some(ProxyBody::FormData { content_type: content_type.to_owned(), bytes }));
    }

    let text = std::str::from_utf8(&bytes).map_err(|e| BffError::BadRequest(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    if content_type.is_some_and(|ct| has_media_type(ct, "text/plain")) {
        return Ok(Some(ProxyBody::Text(text.to_owned())));
    }
    serde_json::from_str(text)
        .map(|value| Some(ProxyBody::Json(value)))
        .map_err(|e| BffError::BadRequest(e.to_string()))
}

/// Wrap handler output: success as a JSON body, failure as `{"message"}`.
pub fn respond<T: Serialize>(result: Result<T, BffError>) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Run `handler` with an authenticated request and render its result.
pub async fn authenticated<F, Fut, T>(request: AuthedRequest, handler: F) -> Response
where
    F: FnOnce(AuthedRequest) -> Fut,
    Fut: Future<Output = Result<T, BffError>>,
    T: Serialize,
{
    respond(handler(request).await)
}

#[cfg(test)]
#[path = "authed_test.rs"]
mod tests;
