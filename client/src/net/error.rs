//! Typed failures surfaced by [`super::api::ApiClient`].

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::types::ErrorBody;

/// Failures from a single API call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Non-2xx response. `message` is the server's, or the status reason.
    #[error("{message}")]
    Http { status: u16, code: Option<String>, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("request aborted")]
    Aborted,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
}

impl ClientError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() { Self::Timeout } else { Self::Network(err.to_string()) }
    }

    /// Build an `Http` error from a failed response's status and raw body.
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = parsed
            .message
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());
        Self::Http { status: status.as_u16(), code: parsed.code, message }
    }
}
