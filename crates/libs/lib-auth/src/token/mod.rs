//! # Session Token Management
//!
//! Issuance, validation, and decoding of the two session token kinds:
//!
//! - **Access token**: short-lived (minutes), carries identity claims,
//!   signed with the access secret. Authorizes individual requests.
//! - **Refresh token**: longer-lived (days), carries only the user id,
//!   signed with a separate refresh secret. Used solely to mint a new pair.
//!
//! Two secrets and two lifetimes decouple "prove who you are right now"
//! from "stay logged in"; a leaked access token dies within minutes.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Signing secrets and lifetimes for both token kinds.
///
/// Built once from application configuration and passed in explicitly;
/// issuance never reads ambient state.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_expiry_minutes: i64,
    pub refresh_expiry_days: i64,
}

/// Errors from token issuance and validation.
///
/// `Expired` and `Invalid` are distinct on purpose: an expired access token
/// should prompt a refresh, an invalid one a full re-login.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token configuration error: {0}")]
    Config(String),

    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Claims carried by a refresh token. Identity id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user id)
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

fn check_signing_inputs(secret: &str, expiry: i64, what: &str) -> Result<(), TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Config(format!("{what} secret is unset")));
    }
    if expiry <= 0 {
        return Err(TokenError::Config(format!("{what} expiry must be positive")));
    }
    Ok(())
}

/// Issue a signed access token for the given identity.
pub fn issue_access_token(
    config: &TokenConfig,
    user_id: i64,
    email: &str,
    username: &str,
    full_name: &str,
) -> Result<String, TokenError> {
    check_signing_inputs(&config.access_secret, config.access_expiry_minutes, "access token")?;

    let now = Utc::now();
    let exp = now + Duration::minutes(config.access_expiry_minutes);

    let claims = AccessClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        username: username.to_string(),
        full_name: full_name.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.access_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Invalid(e.to_string()))
}

/// Issue a signed refresh token carrying only the user id.
pub fn issue_refresh_token(config: &TokenConfig, user_id: i64) -> Result<String, TokenError> {
    check_signing_inputs(&config.refresh_secret, config.refresh_expiry_days, "refresh token")?;

    let now = Utc::now();
    let exp = now + Duration::days(config.refresh_expiry_days);

    let claims = RefreshClaims {
        sub: user_id.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.refresh_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Invalid(e.to_string()))
}

fn decode_with_secret<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Config("verification secret is unset".to_string()));
    }

    decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })
}

/// Decode and validate an access token.
pub fn decode_access_token(token: &str, config: &TokenConfig) -> Result<AccessClaims, TokenError> {
    decode_with_secret(token, &config.access_secret)
}

/// Decode and validate a refresh token.
pub fn decode_refresh_token(token: &str, config: &TokenConfig) -> Result<RefreshClaims, TokenError> {
    decode_with_secret(token, &config.refresh_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_token_config() -> TokenConfig {
        TokenConfig {
            access_secret: "access-test-secret-at-least-32-chars-long!!".to_string(),
            refresh_secret: "refresh-test-secret-at-least-32-chars-long!".to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_days: 7,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = test_token_config();

        let token = issue_access_token(&config, 42, "a@x.com", "alice", "Alice A")
            .expect("access token issuance should succeed");
        let claims = decode_access_token(&token, &config).expect("decoding should succeed");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.full_name, "Alice A");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let config = test_token_config();

        let token = issue_refresh_token(&config, 42).expect("refresh issuance should succeed");
        let claims = decode_refresh_token(&token, &config).expect("decoding should succeed");

        assert_eq!(claims.sub, "42");
    }

    #[test]
    fn test_token_kinds_use_distinct_secrets() {
        let config = test_token_config();

        let refresh = issue_refresh_token(&config, 42).unwrap();
        // A refresh token must not validate as an access token.
        assert!(matches!(
            decode_access_token(&refresh, &config),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let mut config = test_token_config();
        config.access_secret.clear();

        assert!(matches!(
            issue_access_token(&config, 1, "a@x.com", "alice", "Alice"),
            Err(TokenError::Config(_))
        ));
    }

    #[test]
    fn test_nonpositive_expiry_is_config_error() {
        let mut config = test_token_config();
        config.refresh_expiry_days = 0;

        assert!(matches!(
            issue_refresh_token(&config, 1),
            Err(TokenError::Config(_))
        ));
    }

    #[test]
    fn test_expired_token_is_distinct_from_invalid() {
        let config = test_token_config();
        // Sign manually with an exp far enough in the past to clear the
        // default validation leeway.
        let now = Utc::now();
        let claims = AccessClaims {
            sub: "1".to_string(),
            email: "a@x.com".to_string(),
            username: "alice".to_string(),
            full_name: "Alice".to_string(),
            exp: (now - Duration::minutes(5)).timestamp(),
            iat: (now - Duration::minutes(20)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(decode_access_token(&token, &config), Err(TokenError::Expired));
        assert!(matches!(
            decode_access_token("not.a.token", &config),
            Err(TokenError::Invalid(_))
        ));
    }
}
