//! # Core Library
//!
//! Configuration, error handling, and the credential store (user model and
//! repository) for the application.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::{core_config, init_config, Config};
pub use error::{AppError, Result};
pub use model::store::{create_pool, DbPool};
