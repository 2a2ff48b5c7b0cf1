//! Wire types for the BFF's `/api/*` routes.
//!
//! DESIGN
//! ======
//! Field names follow the upstream API's `camelCase` so payloads forwarded by
//! the BFF deserialize without a translation layer.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Signed-in member as returned by `/api/users/me` and the sign-in routes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct KakaoSignInRequest<'a> {
    pub code: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct KakaoSignUpRequest<'a> {
    pub code: &'a str,
    pub nickname: &'a str,
}

/// Body of every sign-in style response. Tokens stay in cookies.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserInfo,
    #[serde(default)]
    pub access_token_expires_at: Option<i64>,
}

/// Body of `POST /api/auth/tokens`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token_expires_at: Option<i64>,
}

/// Error envelope. The BFF always sends `message`; the upstream may add `code`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
