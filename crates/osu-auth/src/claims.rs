//! Unverified JWT claims extraction
//!
//! osu! access tokens are JWTs. The client never checks the signature; it only
//! reads the payload (second dot-separated segment) to learn when the token
//! expires and which scopes it carries.

use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::scope::Scope;

/// Claims decoded from an access token payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry as unix seconds
    pub exp: f64,
    #[serde(default)]
    pub iat: Option<f64>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub scopes: HashSet<String>,
    /// User id for delegated tokens; guest tokens carry an empty subject
    #[serde(default, deserialize_with = "subject_id")]
    pub sub: Option<u64>,
}

impl TokenClaims {
    /// Decode the payload segment of `token`.
    ///
    /// The segment is padded with `=` to a multiple of 4 before base64url
    /// decoding, since JWTs strip padding.
    pub fn decode(token: &str) -> Result<Self> {
        let segment = token
            .split('.')
            .nth(1)
            .ok_or_else(|| Error::Claims("token has no payload segment".into()))?;

        let mut padded = segment.to_owned();
        while padded.len() % 4 != 0 {
            padded.push('=');
        }

        let bytes = URL_SAFE
            .decode(padded.as_bytes())
            .map_err(|e| Error::Claims(format!("payload is not base64url: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| Error::Claims(format!("payload is not a claims object: {e}")))
    }

    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(scope.as_str())
    }

    /// Whether the token is past `exp - margin_secs` at `now` (unix seconds).
    pub fn expires_within(&self, margin_secs: f64, now: f64) -> bool {
        now > self.exp - margin_secs
    }
}

/// `sub` arrives as a number, a numeric string, an empty string or null.
fn subject_id<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSubject {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<RawSubject>::deserialize(deserializer)? {
        Some(RawSubject::Number(id)) => Some(id),
        Some(RawSubject::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
