//! # Request Stamping Middleware
//!
//! Adds request metadata (ID, timestamp) to requests for tracing and
//! debugging. The generated ID lands in request extensions and in the
//! `X-Request-ID` response header.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::SystemTime;
use uuid::Uuid;

/// Request metadata for tracing and debugging.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    /// Unique request identifier
    pub id: String,
    /// Request timestamp
    pub timestamp: SystemTime,
}

impl RequestStamp {
    /// Create a new request stamp with generated ID.
    fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: SystemTime::now(),
        }
    }
}

/// Request stamping middleware.
///
/// Generates a unique request ID and adds it to:
/// - Request extensions (for handler access)
/// - Response headers (`X-Request-ID`)
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let stamp = RequestStamp::new();

    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert("X-Request-ID", header_value);
    }

    res
}
