//! # Authentication Library
//!
//! Password hashing (Argon2) and access/refresh token management (JWT).
//!
//! Token issuance is configured through an explicit [`TokenConfig`]; this
//! crate never reads secrets from the environment itself.

pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use pwd::{hash_password, verify_password, PwdError};
pub use token::{
    decode_access_token, decode_refresh_token, issue_access_token, issue_refresh_token,
    AccessClaims, RefreshClaims, TokenConfig, TokenError,
};
