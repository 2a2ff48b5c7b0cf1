//! Authenticated forwarding to the upstream API.
//!
//! Route handlers hand over the parsed request body; this layer encodes it,
//! attaches the bearer token and delegates to [`UpstreamClient::fetch`].

use axum::body::Bytes;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;

use super::upstream::{FetchOptions, UpstreamClient, UpstreamError};

/// A request body as received from the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyBody {
    /// Parsed JSON; re-serialized before forwarding.
    Json(Value),
    /// `multipart/form-data`, forwarded byte-for-byte with its boundary.
    FormData { content_type: String, bytes: Bytes },
    /// Pre-encoded text, forwarded unchanged.
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct ProxyOptions {
    pub method: Method,
    pub body: Option<ProxyBody>,
    pub headers: HeaderMap,
    pub query: Option<String>,
}

impl ProxyOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    #[must_use]
    pub fn with_body(mut self, body: Option<ProxyBody>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_json(self, value: Value) -> Self {
        self.with_body(Some(ProxyBody::Json(value)))
    }

    #[must_use]
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query.map(str::to_owned);
        self
    }
}

/// Forward a call upstream, authenticating with `access_token` when given.
///
/// # Errors
///
/// Propagates [`UpstreamError`] from the fetch helper; a token that cannot be
/// placed in a header is reported as `UpstreamError::Request`.
pub async fn forward(
    upstream: &UpstreamClient,
    endpoint: &str,
    options: ProxyOptions,
    access_token: Option<&str>,
) -> Result<Value, UpstreamError> {
    let ProxyOptions { method, body, mut headers, query } = options;

    if let Some(token) = access_token {
        headers.insert(AUTHORIZATION, bearer(token)?);
    }

    let body = match body {
        Some(body) => Some(encode_body(body, &mut headers)?),
        None => None,
    };

    upstream
        .fetch(endpoint, FetchOptions { method, headers, body, query, timeout: None })
        .await
}

pub(crate) fn bearer(token: &str) -> Result<HeaderValue, UpstreamError> {
    HeaderValue::try_from(format!("Bearer {token}")).map_err(|e| UpstreamError::Request(e.to_string()))
}

/// Encode `body` and set its content type unless the caller already did.
fn encode_body(body: ProxyBody, headers: &mut HeaderMap) -> Result<Bytes, UpstreamError> {
    match body {
        ProxyBody::Json(value) => {
            let bytes = serde_json::to_vec(&value).map_err(|e| UpstreamError::Request(e.to_string()))?;
            headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
            Ok(Bytes::from(bytes))
        }
        ProxyBody::FormData { content_type, bytes } => {
            let value = HeaderValue::try_from(content_type).map_err(|e| UpstreamError::Request(e.to_string()))?;
            headers.insert(CONTENT_TYPE, value);
            Ok(bytes)
        }
        ProxyBody::Text(text) => {
            headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("text/plain; charset=utf-8"));
            Ok(Bytes::from(text))
        }
    }
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
