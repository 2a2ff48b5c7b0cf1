//! JWT expiry inspection.
//!
//! The BFF never verifies upstream tokens (it has no key); it only reads the
//! `exp` claim to size cookie lifetimes and report expiry to the client.

use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Current Unix time in seconds.
#[must_use]
pub fn now_secs() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// The `exp` claim in Unix seconds, if the token is a readable JWT.
#[must_use]
pub fn expiry(token: &str) -> Option<i64> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .and_then(|data| data.claims.exp)
}

/// Remaining lifetime in seconds at `now`, clamped at zero.
#[must_use]
pub fn max_age_secs(token: &str, now: i64) -> Option<i64> {
    expiry(token).map(|exp| (exp - now).max(0))
}

/// Expiry as epoch milliseconds, the unit the browser session uses.
#[must_use]
pub fn expires_at_ms(token: &str) -> Option<i64> {
    expiry(token).map(|exp| exp.saturating_mul(1000))
}

#[cfg(test)]
#[path = "jwt_test.rs"]
mod tests;
