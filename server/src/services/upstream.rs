//! Server-side fetch helper for the upstream backend API.
//!
//! ERROR HANDLING
//! ==============
//! Any non-2xx response becomes `UpstreamError::Api { status, message }`, the
//! one error shape route handlers pass through to the browser unchanged.
//! Transport failures and timeouts are kept distinct so logs can tell them
//! apart, but they all surface as the generic network error.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// The upstream API answered with a non-success status.
    #[error("upstream responded {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("upstream request failed: {0}")]
    Network(String),

    #[error("upstream request timed out")]
    Timeout,

    /// The request could not be assembled (bad header value, bad URL).
    #[error("upstream request could not be built: {0}")]
    Request(String),

    /// A success response did not have the expected shape.
    #[error("upstream response parse failed: {0}")]
    Decode(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl UpstreamError {
    /// HTTP status reported by the upstream, if it answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() { Self::Timeout } else { Self::Network(err.to_string()) }
    }
}

/// A single upstream call. The body is already encoded; its content type
/// travels in `headers`.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub query: Option<String>,
    /// Overrides the client's default timeout for this call.
    pub timeout: Option<Duration>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), timeout })
    }

    /// Join the base URL, `endpoint` and an optional raw query string.
    #[must_use]
    pub fn url_for(&self, endpoint: &str, query: Option<&str>) -> String {
        let mut url = self.base_url.clone();
        if !endpoint.starts_with('/') {
            url.push('/');
        }
        url.push_str(endpoint);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Send a request and return the parsed JSON body.
    ///
    /// Empty success bodies (e.g. 204) come back as `Value::Null`; non-JSON
    /// success bodies come back as `Value::String`.
    ///
    /// # Errors
    ///
    /// `Api` for non-2xx responses, `Timeout`/`Network` for transport failures.
    pub async fn fetch(&self, endpoint: &str, options: FetchOptions) -> Result<Value, UpstreamError> {
        let url = self.url_for(endpoint, options.query.as_deref());
        let method = options.method.clone();
        let mut request = self
            .http
            .request(options.method, url.as_str())
            .headers(options.headers)
            .timeout(options.timeout.unwrap_or(self.timeout));
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %endpoint, error = %e, "upstream request failed");
            UpstreamError::from_reqwest(&e)
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        if !status.is_success() {
            tracing::debug!(%method, %endpoint, status = status.as_u16(), "upstream returned error status");
            return Err(UpstreamError::Api { status: status.as_u16(), message: error_message(status, &text) });
        }

        Ok(parse_success_body(&text))
    }
}

/// Pull `message` out of an upstream error body, falling back to the reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Upstream error").to_owned())
}

pub(crate) fn parse_success_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
#[path = "upstream_test.rs"]
mod tests;
