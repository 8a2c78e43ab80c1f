//! # Password Hashing
//!
//! Password hashing and verification using Argon2.
//!
//! Hashing happens exactly once per plaintext: callers store the returned
//! PHC string and must never feed it back into [`hash_password`].

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Errors raised by hashing and verification.
///
/// A wrong password is NOT an error: [`verify_password`] returns `Ok(false)`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PwdError {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Stored password hash is malformed")]
    InvalidHash,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Hash a password using the Argon2 algorithm.
pub fn hash_password(password: &str) -> Result<String, PwdError> {
    if password.len() < 8 {
        return Err(PwdError::TooShort);
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PwdError::Hash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext password against an Argon2 hash.
///
/// Mismatch yields `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PwdError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PwdError::InvalidHash)?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
