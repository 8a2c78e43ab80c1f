//! # Request/Response Logging Middleware
//!
//! Logs method, path, status, and duration for every request, correlated by
//! the request ID from [`mw_req_stamp`](crate::middleware::mw_req_stamp).
//! Credential-carrying endpoints are never logged with query strings or
//! bodies.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{error, info, warn};

/// Endpoints that receive credentials; their query strings are suppressed.
const SENSITIVE_ENDPOINTS: &[&str] = &[
    "/api/users/register",
    "/api/users/login",
    "/api/users/refresh-token",
    "/api/users/change-password",
];

/// Request/response logging middleware.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_string();

    let request_id = req
        .extensions()
        .get::<crate::middleware::mw_req_stamp::RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let is_sensitive = SENSITIVE_ENDPOINTS.iter().any(|ep| path.starts_with(ep));
    let query = if is_sensitive {
        None
    } else {
        uri.query().map(str::to_string)
    };

    info!(
        request_id = %request_id,
        "[REQ] {} {}{}",
        method,
        path,
        query.map(|q| format!("?{q}")).unwrap_or_default()
    );

    let res = next.run(req).await;

    let status = res.status();
    let elapsed_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        error!(request_id = %request_id, "[RES] {} {} -> {} ({}ms)", method, path, status, elapsed_ms);
    } else if status.is_client_error() {
        warn!(request_id = %request_id, "[RES] {} {} -> {} ({}ms)", method, path, status, elapsed_ms);
    } else {
        info!(request_id = %request_id, "[RES] {} {} -> {} ({}ms)", method, path, status, elapsed_ms);
    }

    res
}
