//! # Services
//!
//! Business-logic services used by the HTTP handlers.
//!
//! - **[`session`]**: login, logout, registration, and refresh-token rotation
//! - **[`media`]**: durable storage for uploaded avatar/cover files

pub mod media;
pub mod session;

pub use media::{LocalMediaStore, MediaStore};
pub use session::SessionService;
