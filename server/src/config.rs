//! BFF configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Everything is read once at startup into a typed `Config`. Parsing goes
//! through a lookup closure so tests can feed variables without touching the
//! process environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const KAKAO_AUTHORIZE_URL: &str = "https://kauth.kakao.com/oauth/authorize";

/// Path the Kakao redirect lands on when only the site URL is configured.
const KAKAO_CALLBACK_PATH: &str = "/oauth/kakao";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Kakao OAuth settings. Present only when both the REST key and a redirect
/// URI can be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KakaoConfig {
    pub rest_api_key: String,
    pub redirect_uri: String,
}

impl KakaoConfig {
    /// Build the Kakao authorization URL, carrying `state` back to the callback.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> Option<String> {
        reqwest::Url::parse_with_params(
            KAKAO_AUTHORIZE_URL,
            &[
                ("client_id", self.rest_api_key.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("state", state),
            ],
        )
        .ok()
        .map(String::from)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream backend base URL, without trailing slash.
    pub api_url: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub cookie_secure: bool,
    pub upstream_timeout: Duration,
    pub kakao: Option<KakaoConfig>,
}

impl Config {
    /// Build typed config from the process environment.
    ///
    /// Required:
    /// - `API_URL` (falls back to `NEXT_PUBLIC_API_URL`)
    ///
    /// Optional:
    /// - `NEXT_PUBLIC_SITE_URL`: public origin
    /// - `KAKAO_REST_API_KEY`, `KAKAO_REDIRECT_URI`: Kakao OAuth
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: default `public`
    /// - `APP_ENV`: `production` turns on secure cookies
    /// - `COOKIE_SECURE`: explicit override for the secure flag
    /// - `UPSTREAM_TIMEOUT_MS`: default 10000
    ///
    /// # Errors
    ///
    /// Returns an error if `API_URL` is missing or a numeric value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_url = non_empty("API_URL")
            .or_else(|| non_empty("NEXT_PUBLIC_API_URL"))
            .ok_or(ConfigError::Missing("API_URL"))?
            .trim_end_matches('/')
            .to_owned();

        let site_url = non_empty("NEXT_PUBLIC_SITE_URL").map(|v| v.trim_end_matches('/').to_owned());

        let port = match non_empty("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let timeout_ms = match non_empty("UPSTREAM_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { key: "UPSTREAM_TIMEOUT_MS", value: raw })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_MS,
        };

        let static_dir = non_empty("STATIC_DIR").map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);

        let production = non_empty("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production"));
        let cookie_secure = non_empty("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(production);

        let kakao = non_empty("KAKAO_REST_API_KEY").and_then(|rest_api_key| {
            let redirect_uri = non_empty("KAKAO_REDIRECT_URI")
                .or_else(|| site_url.as_ref().map(|site| format!("{site}{KAKAO_CALLBACK_PATH}")))?;
            Some(KakaoConfig { rest_api_key, redirect_uri })
        });

        Ok(Self {
            api_url,
            port,
            static_dir,
            cookie_secure,
            upstream_timeout: Duration::from_millis(timeout_ms),
            kakao,
        })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
