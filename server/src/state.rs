//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! BFF holds no per-user data: sessions live entirely in the browser's
//! cookies, so state is just configuration plus a pooled upstream client.

use std::sync::Arc;

use crate::config::Config;
use crate::services::upstream::{UpstreamClient, UpstreamError};

/// Clone is required by Axum; both fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: UpstreamClient,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(&config.api_url, config.upstream_timeout)?;
        Ok(Self { config: Arc::new(config), upstream })
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.config.cookie_secure
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
