//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between API clients and the backend.
//! All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Registration, login, and session token DTOs
//!   - **[`dto::user`]**: Profile and account management DTOs
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON using the default `serde` behavior:
//! - Field names use **snake_case** in Rust, which maps to **snake_case** in JSON by default
//! - All structs implement both `Serialize` and `Deserialize` for bidirectional communication

pub mod dto;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
