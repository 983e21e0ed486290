//! Stateless session token issuance and verification.
//!
//! Tokens are `HS256` JWTs binding the subject user id, signed with a
//! process-wide secret injected at construction. There is no storage behind
//! this pair: `issue`/`verify` are pure functions over the key material.

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let key_bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(key_bytes),
            decoding: DecodingKey::from_secret(key_bytes),
            ttl_seconds,
        }
    }

    /// Sign a time-limited token for the given subject.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = now_unix_seconds();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("failed to sign session token")
    }

    /// Resolve a token to its subject id.
    ///
    /// Fails closed: malformed, unsigned, tampered, expired, and non-UUID
    /// subjects all yield `None`.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .ok()
            .and_then(|data| Uuid::parse_str(&data.claims.sub).ok())
    }
}

fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
