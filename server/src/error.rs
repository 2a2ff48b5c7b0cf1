//! Route-level error type and its JSON rendering.
//!
//! Every failure reaching the browser is `{"message": "..."}`. Upstream API
//! errors keep their status and message; everything else that is not the
//! caller's fault collapses into a 500 with a generic network message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::services::upstream::UpstreamError;

pub const TOKEN_ERROR_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const NETWORK_ERROR_MESSAGE: &str = "A network error occurred. Please try again in a moment.";
pub const BAD_REQUEST_MESSAGE: &str = "The request body could not be read.";
pub const LOGOUT_MESSAGE: &str = "Logged out.";
pub const OAUTH_UNAVAILABLE_MESSAGE: &str = "Kakao login is not configured.";

#[derive(Debug, thiserror::Error)]
pub enum BffError {
    /// No usable access or refresh token cookie.
    #[error("missing auth token")]
    MissingToken,

    /// The browser sent a body we could not parse.
    #[error("bad request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("service unavailable: {0}")]
    Unavailable(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BffError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(UpstreamError::Api { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the browser. Internal detail never leaks here.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingToken => TOKEN_ERROR_MESSAGE.to_owned(),
            Self::BadRequest(_) => BAD_REQUEST_MESSAGE.to_owned(),
            Self::Upstream(UpstreamError::Api { message, .. }) => message.clone(),
            Self::Unavailable(message) => (*message).to_owned(),
            Self::Upstream(_) | Self::Internal(_) => NETWORK_ERROR_MESSAGE.to_owned(),
        }
    }
}

impl IntoResponse for BffError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
