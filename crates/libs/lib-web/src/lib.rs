//! # Web Library
//!
//! HTTP handlers, middleware, session/media services, and server setup.

pub mod cookies;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{start_server, AppState, ServerConfig};
