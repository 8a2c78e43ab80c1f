//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! API clients and the backend via the REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Registration, login, logout, and token refresh DTOs
//! - [`user`] - Profile, avatar, and password management DTOs

pub mod auth;
pub mod user;

pub use auth::*;
pub use user::*;
