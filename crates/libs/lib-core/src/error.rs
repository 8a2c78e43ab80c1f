//! # Centralized Error Handling
//!
//! Application-wide error type [`AppError`] used consistently across all
//! backend modules, following the `thiserror` pattern.
//!
//! ## Error Categories
//!
//! 1. **Client errors** (4xx)
//!    - [`Validation`](AppError::Validation) → 400 Bad Request
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!    - [`Conflict`](AppError::Conflict) → 409 Conflict
//!    - [`InvalidCredentials`](AppError::InvalidCredentials),
//!      [`TokenInvalid`](AppError::TokenInvalid),
//!      [`TokenExpired`](AppError::TokenExpired),
//!      [`TokenMismatch`](AppError::TokenMismatch) → 401 Unauthorized
//!
//! 2. **Server errors** (5xx)
//!    - [`Config`](AppError::Config), [`Internal`](AppError::Internal) → 500
//!    - [`Upstream`](AppError::Upstream) → 502 Bad Gateway
//!
//! The three token variants are deliberately distinct: expired tokens prompt
//! a refresh, invalid tokens a re-login, and a mismatch means the presented
//! refresh token was superseded by rotation or logout.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lib_auth::{PwdError, TokenError};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Password verification failed for an existing account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Duplicate username/email. The message never names the colliding field.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Token signature invalid or token malformed.
    #[error("Token is invalid: {0}")]
    TokenInvalid(String),

    /// Token cryptographically valid but past its expiry.
    #[error("Token has expired")]
    TokenExpired,

    /// Refresh token valid but superseded by rotation or logout.
    #[error("Refresh token is no longer valid")]
    TokenMismatch,

    /// Configuration error (missing secrets, bad expiries).
    #[error("Configuration error: {0}")]
    Config(String),

    /// An external collaborator (media store, database) is unavailable.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Internal server error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::TokenInvalid(_)
            | AppError::TokenExpired
            | AppError::TokenMismatch => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code, one per variant.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::NotFound(_) => "NotFound",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::Conflict(_) => "Conflict",
            AppError::TokenInvalid(_) => "TokenInvalid",
            AppError::TokenExpired => "TokenExpired",
            AppError::TokenMismatch => "TokenMismatch",
            AppError::Config(_) => "Config",
            AppError::Upstream(_) => "Upstream",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-facing error message.
    ///
    /// Server-side failures return a generic message to avoid exposing
    /// implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::TokenInvalid(_) => "Token is invalid".to_string(),
            AppError::TokenExpired => "Token has expired".to_string(),
            AppError::TokenMismatch => "Refresh token is no longer valid".to_string(),
            AppError::Upstream(_) => "Service temporarily unavailable".to_string(),
            AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Full error detail goes to the server log, not the client.
        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(json!({
            "error": self.user_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Convert `sqlx::Error` to `AppError`.
///
/// Unique-constraint violations surface as a generic `Conflict` so callers
/// cannot probe which field (username or email) collided.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("User already exists".to_string())
            }
            sqlx::Error::Database(db_err) => {
                AppError::Internal(format!("Database error: {}", db_err.message()))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Upstream(format!("Database unavailable: {}", err))
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert token layer errors to `AppError`.
impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid(msg) => AppError::TokenInvalid(msg),
            TokenError::Config(msg) => AppError::Config(msg),
        }
    }
}

/// Convert password layer errors to `AppError`.
impl From<PwdError> for AppError {
    fn from(err: PwdError) -> Self {
        match err {
            PwdError::TooShort => AppError::Validation(err.to_string()),
            // A malformed stored hash or a hasher failure is a data/server
            // problem, never the caller's.
            PwdError::InvalidHash | PwdError::Hash(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
