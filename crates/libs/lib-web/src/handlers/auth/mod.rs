//! # Authentication Handlers
//!
//! HTTP request handlers for the account/session endpoints:
//!
//! - `POST /api/users/register` - multipart signup with avatar upload
//! - `POST /api/users/login` - open a session, issue token pair
//! - `POST /api/users/refresh-token` - rotate the refresh token
//! - `POST /api/users/logout` - close the session (protected)
//!
//! Tokens travel in the JSON body and as `HttpOnly` cookies; the refresh
//! endpoint accepts either, with the body taking precedence.

#[cfg(test)]
mod tests;

use axum::{
    extract::{Multipart, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Extension, Json,
};
use lib_auth::AccessClaims;
use lib_core::{AppError, Config, Result};
use shared::{ApiMessage, AuthResponse, LoginRequest, RefreshRequest, RegisterResponse, TokenPair};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::cookies::{
    clear_cookie, cookie_value, session_cookie, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
};
use crate::handlers::user_info;
use crate::services::session::RegisterInput;
use crate::services::{MediaStore, SessionService};

/// Collected multipart fields for registration.
#[derive(Default)]
struct RegisterForm {
    username: Option<String>,
    email: Option<String>,
    full_name: Option<String>,
    password: Option<String>,
    avatar: Option<(Vec<u8>, Option<String>)>,
    cover_image: Option<(Vec<u8>, Option<String>)>,
}

impl RegisterForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?;

            match name.as_str() {
                "username" => form.username = Some(String::from_utf8_lossy(&data).into_owned()),
                "email" => form.email = Some(String::from_utf8_lossy(&data).into_owned()),
                "full_name" => form.full_name = Some(String::from_utf8_lossy(&data).into_owned()),
                "password" => form.password = Some(String::from_utf8_lossy(&data).into_owned()),
                "avatar" => form.avatar = Some((data.to_vec(), file_name)),
                "cover_image" => form.cover_image = Some((data.to_vec(), file_name)),
                other => debug!("[REGISTER] Ignoring unknown multipart field: {}", other),
            }
        }

        Ok(form)
    }

    fn required(value: Option<String>, field: &str) -> Result<String> {
        value.ok_or_else(|| AppError::Validation(format!("{field} is required")))
    }
}

/// Registration handler - creates a new account from a multipart form.
///
/// Expects text fields `username`, `email`, `full_name`, `password`, a
/// required `avatar` file part, and an optional `cover_image` file part.
/// Returns `201 Created` with the public user record; the new account still
/// has to log in to obtain tokens.
#[instrument(skip_all)]
pub async fn register(
    State(session): State<SessionService>,
    State(media_store): State<Arc<dyn MediaStore>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    info!("[REGISTER] New registration request");

    let form = RegisterForm::from_multipart(multipart).await?;

    let username = RegisterForm::required(form.username, "Username")?;
    let email = RegisterForm::required(form.email, "Email")?;
    let full_name = RegisterForm::required(form.full_name, "Full name")?;
    let password = RegisterForm::required(form.password, "Password")?;

    let (avatar_bytes, avatar_name) = form
        .avatar
        .filter(|(data, _)| !data.is_empty())
        .ok_or_else(|| AppError::Validation("Avatar file is required".to_string()))?;

    let avatar_url =
        crate::handlers::store_upload(&media_store, &avatar_bytes, avatar_name.as_deref()).await?;

    let cover_image_url = match form.cover_image.filter(|(data, _)| !data.is_empty()) {
        Some((data, name)) => {
            Some(crate::handlers::store_upload(&media_store, &data, name.as_deref()).await?)
        }
        None => None,
    };

    let user = session
        .register(RegisterInput {
            username,
            email,
            full_name,
            password,
            avatar_url,
            cover_image_url,
        })
        .await
        .inspect_err(|e| {
            // The uploaded media is orphaned at this point; log so it can be
            // reaped offline.
            warn!("[REGISTER] Registration failed after media upload: {}", e);
        })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user_info(&user),
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Login handler - verifies credentials and opens a session.
///
/// Returns the token pair in the body and mirrors it into `HttpOnly` session
/// cookies for browser clients.
#[instrument(skip_all, fields(login = %req.username_or_email))]
pub async fn login(
    State(session): State<SessionService>,
    State(config): State<Config>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    info!("[LOGIN] Login request");

    let (user, pair) = session.login(&req.username_or_email, &req.password).await?;

    let cookies = token_cookies(&config, &pair);
    let body = AuthResponse {
        user: user_info(&user),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        message: "Login successful".to_string(),
    };

    Ok((cookies, Json(body)))
}

/// Refresh handler - validates the presented refresh token and rotates it.
///
/// The token is taken from the JSON body when provided, otherwise from the
/// `refresh_token` cookie. The superseded token is permanently invalidated.
#[instrument(skip_all)]
pub async fn refresh(
    State(session): State<SessionService>,
    State(config): State<Config>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> Result<impl IntoResponse> {
    let presented = body
        .and_then(|Json(req)| req.refresh_token)
        .or_else(|| cookie_value(&headers, REFRESH_TOKEN_COOKIE))
        .ok_or_else(|| AppError::TokenInvalid("missing refresh token".to_string()))?;

    let pair = session.refresh(&presented).await?;

    let cookies = token_cookies(&config, &pair);
    Ok((cookies, Json(pair)))
}

/// Logout handler - closes the authenticated session.
///
/// Clears the stored refresh token and expires both session cookies.
/// Idempotent: logging out twice succeeds.
#[instrument(skip_all, fields(user_id = %claims.sub))]
pub async fn logout(
    State(session): State<SessionService>,
    Extension(claims): Extension<AccessClaims>,
) -> Result<impl IntoResponse> {
    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::TokenInvalid("malformed subject claim".to_string()))?;

    session.logout(user_id).await?;

    let cookies = AppendHeaders([
        (SET_COOKIE, clear_cookie(ACCESS_TOKEN_COOKIE)),
        (SET_COOKIE, clear_cookie(REFRESH_TOKEN_COOKIE)),
    ]);

    Ok((
        cookies,
        Json(ApiMessage {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

/// Build the `Set-Cookie` pair mirroring a freshly issued token pair.
fn token_cookies(config: &Config, pair: &TokenPair) -> AppendHeaders<[(axum::http::HeaderName, String); 2]> {
    AppendHeaders([
        (
            SET_COOKIE,
            session_cookie(
                ACCESS_TOKEN_COOKIE,
                &pair.access_token,
                config.access_token_expiry_minutes * 60,
            ),
        ),
        (
            SET_COOKIE,
            session_cookie(
                REFRESH_TOKEN_COOKIE,
                &pair.refresh_token,
                config.refresh_token_expiry_days * 24 * 60 * 60,
            ),
        ),
    ])
}
