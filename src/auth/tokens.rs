// src/auth/tokens.rs
//! Token issuance and validation
//!
//! Tokens move through three states: issued, valid, expired. There is no
//! revocation; an expired token can never become valid again.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::models::Claims;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("invalid token")]
    Invalid,
}

/// Issues and validates HS256-signed bearer tokens against one shared
/// secret. Pure function of its inputs; safe to clone into handlers.
#[derive(Clone)]
pub struct TokenAuthority {
    secret: String,
}

impl TokenAuthority {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Build claims expiring `ttl` from now, sign them, and return the
    /// serialized token.
    pub fn issue(&self, subject: &str, admin: bool, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            admin,
            exp: (Utc::now() + ttl).timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Signing)
    }

    /// Verify a token and return its claims.
    ///
    /// A token whose header names any algorithm other than HS256 is
    /// rejected outright, before signature verification. Bad signature,
    /// wrong algorithm, and elapsed expiry all collapse into the same
    /// [`TokenError::Invalid`] so callers cannot probe which check failed.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
    }
}
