//! # Authentication Middleware
//!
//! The gate in front of protected routes: extracts the access token from the
//! `Authorization: Bearer` header or the `access_token` cookie, validates it,
//! and injects the decoded [`AccessClaims`] into request extensions.
//!
//! Purely a gate - it never issues, rotates, or persists tokens. Expired and
//! invalid tokens reject with distinct error codes so clients know whether to
//! refresh or to re-login.
//!
//! Handlers extract the claims with `Extension<AccessClaims>`:
//!
//! ```rust,ignore
//! async fn protected_handler(Extension(claims): Extension<AccessClaims>) -> String {
//!     format!("Hello, {}!", claims.username)
//! }
//! ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use lib_auth::decode_access_token;
use lib_core::{AppError, Config};
use tracing::{debug, warn};

use crate::cookies::{cookie_value, ACCESS_TOKEN_COOKIE};

/// Authentication middleware that validates access tokens.
///
/// # Behavior
///
/// - **Valid token**: continues to the handler with `AccessClaims` in extensions
/// - **Expired token**: rejects with `TokenExpired` (client should refresh)
/// - **Missing/invalid token**: rejects with `TokenInvalid` (client must re-login)
pub async fn require_auth(
    State(config): State<Config>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = match bearer.or_else(|| cookie_value(req.headers(), ACCESS_TOKEN_COOKIE)) {
        Some(token) => token,
        None => {
            warn!("[AUTH] Missing access token (no bearer header or cookie)");
            return Err(AppError::TokenInvalid("missing access token".to_string()));
        }
    };

    let claims = decode_access_token(&token, &config.token_config()).map_err(|e| {
        warn!("[AUTH] Access token rejected: {}", e);
        AppError::from(e)
    })?;

    debug!("[AUTH] Authenticated user: {} (id: {})", claims.username, claims.sub);

    // Inject claims into request extensions
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
