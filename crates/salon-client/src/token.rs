//! # Token Types
//!
//! The access/refresh token pair and the small amount of JWT inspection the
//! client needs: reading `exp` to decide whether the refresh token should be
//! renewed before the next request.
//!
//! Signatures are never checked here. The client has no key; the backend
//! verifies every token it receives.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Refresh tokens expiring within this window are renewed proactively.
pub const REFRESH_RENEWAL_WINDOW: Duration = Duration::days(3);

/// Access and refresh token as issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        TokenPair {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Token values must never reach the logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// The claims the client reads from a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

/// Decodes the payload of a JWT without verifying its signature.
///
/// Returns `None` for anything that is not a well-formed JWT.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

/// Whether `token` expires within `window` of `now`.
///
/// `None` when the token cannot be decoded or carries no `exp`; callers
/// treat that as "do not renew" and let the backend decide.
pub fn expires_within(token: &str, window: Duration, now: DateTime<Utc>) -> Option<bool> {
    let expires_at = decode_claims(token)?.expires_at()?;
    Some(expires_at - now <= window)
}
