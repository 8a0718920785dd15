//! Signed token codec (HS256 JWT)
//!
//! One codec serves both token families. Access and refresh tokens differ
//! only in their [`TokenConfig`]: each family carries its own secret and
//! lifetime, loaded once at startup from `[security]` in the config file.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Signing configuration for one token family
#[derive(Clone)]
pub struct TokenConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub ttl_secs: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }
}

/// Decoded token payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (the principal's email)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create new claims for a subject
    pub fn new(subject: &str, config: &TokenConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(config.ttl_secs);

        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Sign a token for a subject
pub fn issue_token(subject: &str, config: &TokenConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(subject, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a token.
///
/// Fails on signature mismatch, malformed encoding, or an elapsed expiry.
/// Expiry is checked with zero leeway. No authorization decision is made
/// here; role checks belong to the authorization gate.
pub fn verify_token(token: &str, config: &TokenConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}
