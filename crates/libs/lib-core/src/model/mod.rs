//! # Data Model
//!
//! Persistence layer: connection pool, row models, and repositories.

pub mod store;
