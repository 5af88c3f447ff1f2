//! Session token generation and validation
//!
//! Stateless JWT access tokens signed with HMAC-SHA256. A token asserts a
//! subject (the user id), an issue time, and a fixed-TTL expiry; validity is
//! fully determined by the signature and the clock at verification time.
//! There is no renewal and no revocation list; after expiry the client
//! re-authenticates.

use ficrec_core::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Claims embedded in an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - user id
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
}

impl Claims {
    /// The user id the token was issued for.
    pub fn subject(&self) -> Result<i64, JwtError> {
        self.sub.parse().map_err(|_| JwtError::InvalidToken)
    }
}

/// Token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// Issue an access token for an authenticated user.
///
/// The expiry is `now + token_ttl_secs` from the configuration; the TTL is
/// not a per-call decision.
pub fn issue_token(config: &AuthConfig, user_id: i64) -> Result<String, JwtError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: user_id.to_string(),
        iat: now,
        exp: now + config.token_ttl_secs,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate an access token and extract its claims.
///
/// Fails closed: a malformed token, a signature mismatch, and an expired
/// token each yield an error, never partial claims.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_token() {
        let config = AuthConfig::default();

        let token = issue_token(&config, 42).expect("Failed to issue token");
        let claims = verify_token(&config, &token).expect("Failed to verify token");

        assert_eq!(claims.subject().unwrap(), 42);
        assert_eq!(claims.iss, config.issuer);
        assert_eq!(claims.exp, claims.iat + config.token_ttl_secs);
    }

    #[test]
    fn test_malformed_token() {
        let config = AuthConfig::default();
        let result = verify_token(&config, "not.a.token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let config1 = AuthConfig {
            secret: "secret1".to_string(),
            ..Default::default()
        };
        let config2 = AuthConfig {
            secret: "secret2".to_string(),
            ..Default::default()
        };

        let token = issue_token(&config1, 1).unwrap();
        let result = verify_token(&config2, &token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token() {
        let config = AuthConfig::default();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Issued two hours ago, expired one hour ago.
        let claims = Claims {
            iss: config.issuer.clone(),
            sub: "1".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_token(&config, &token);
        assert!(matches!(result, Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let issuing = AuthConfig {
            issuer: "someone-else".to_string(),
            ..Default::default()
        };
        let verifying = AuthConfig::default();

        let token = issue_token(&issuing, 1).unwrap();
        assert!(verify_token(&verifying, &token).is_err());
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            iss: "x".to_string(),
            sub: "abc".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(claims.subject().is_err());
    }
}
