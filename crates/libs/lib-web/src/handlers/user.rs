//! # User Profile Handlers
//!
//! Protected endpoints operating on the authenticated account:
//!
//! - `GET /api/users/me` - current user record
//! - `PATCH /api/users/update-profile` - change full name and/or email
//! - `PATCH /api/users/avatar` - replace the avatar image
//! - `PATCH /api/users/cover-image` - replace the cover image
//! - `POST /api/users/change-password` - rotate the password
//!
//! All handlers resolve the target account from the access-token claims
//! injected by the auth middleware; the client never names a user ID.

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use lib_auth::AccessClaims;
use lib_core::model::store::{UserForUpdate, UserRepository};
use lib_core::{AppError, DbPool, Result};
use lib_utils::{validate_email, validate_not_empty};
use shared::{ApiMessage, ChangePasswordRequest, UpdateProfileRequest, UserResponse};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::handlers::user_info;
use crate::services::{MediaStore, SessionService};

fn claims_user_id(claims: &AccessClaims) -> Result<i64> {
    claims
        .sub
        .parse()
        .map_err(|_| AppError::TokenInvalid("malformed subject claim".to_string()))
}

/// Current-user handler.
#[instrument(skip_all, fields(user_id = %claims.sub))]
pub async fn me(
    State(pool): State<DbPool>,
    Extension(claims): Extension<AccessClaims>,
) -> Result<Json<UserResponse>> {
    let user_id = claims_user_id(&claims)?;

    let user = UserRepository::find_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

    Ok(Json(UserResponse {
        user: user_info(&user),
        message: "Current user fetched successfully".to_string(),
    }))
}

/// Profile update handler. Only the provided fields change.
#[instrument(skip_all, fields(user_id = %claims.sub))]
pub async fn update_profile(
    State(pool): State<DbPool>,
    Extension(claims): Extension<AccessClaims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    let user_id = claims_user_id(&claims)?;

    let mut update = UserForUpdate::new();

    if let Some(full_name) = req.full_name {
        validate_not_empty(&full_name, "Full name").map_err(AppError::Validation)?;
        update = update.full_name(full_name.trim().to_string());
    }
    if let Some(email) = req.email {
        validate_email(&email).map_err(AppError::Validation)?;
        update = update.email(email.trim().to_lowercase());
    }

    if update.is_empty() {
        return Err(AppError::Validation(
            "At least one field must be provided".to_string(),
        ));
    }

    let user = UserRepository::update(&pool, user_id, update).await?;

    info!("[PROFILE] Profile updated for user {}", user_id);
    Ok(Json(UserResponse {
        user: user_info(&user),
        message: "Profile updated successfully".to_string(),
    }))
}

/// Avatar replacement handler. Expects a multipart body with an `avatar`
/// file part.
#[instrument(skip_all, fields(user_id = %claims.sub))]
pub async fn update_avatar(
    State(pool): State<DbPool>,
    State(media_store): State<Arc<dyn MediaStore>>,
    Extension(claims): Extension<AccessClaims>,
    multipart: Multipart,
) -> Result<Json<UserResponse>> {
    let user_id = claims_user_id(&claims)?;

    let url = store_file_part(multipart, "avatar", &media_store).await?;
    let user = UserRepository::update(&pool, user_id, UserForUpdate::new().avatar_url(url)).await?;

    info!("[PROFILE] Avatar updated for user {}", user_id);
    Ok(Json(UserResponse {
        user: user_info(&user),
        message: "Avatar updated successfully".to_string(),
    }))
}

/// Cover-image replacement handler. Expects a multipart body with a
/// `cover_image` file part.
#[instrument(skip_all, fields(user_id = %claims.sub))]
pub async fn update_cover_image(
    State(pool): State<DbPool>,
    State(media_store): State<Arc<dyn MediaStore>>,
    Extension(claims): Extension<AccessClaims>,
    multipart: Multipart,
) -> Result<Json<UserResponse>> {
    let user_id = claims_user_id(&claims)?;

    let url = store_file_part(multipart, "cover_image", &media_store).await?;
    let user =
        UserRepository::update(&pool, user_id, UserForUpdate::new().cover_image_url(url)).await?;

    info!("[PROFILE] Cover image updated for user {}", user_id);
    Ok(Json(UserResponse {
        user: user_info(&user),
        message: "Cover image updated successfully".to_string(),
    }))
}

/// Password change handler. Requires the current password.
#[instrument(skip_all, fields(user_id = %claims.sub))]
pub async fn change_password(
    State(session): State<SessionService>,
    Extension(claims): Extension<AccessClaims>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiMessage>> {
    let user_id = claims_user_id(&claims)?;

    session
        .change_password(user_id, &req.old_password, &req.new_password)
        .await?;

    Ok(Json(ApiMessage {
        message: "Password changed successfully".to_string(),
    }))
}

/// Pull the named file part out of a multipart body and persist it,
/// returning the durable URL.
async fn store_file_part(
    mut multipart: Multipart,
    part_name: &str,
    media_store: &Arc<dyn MediaStore>,
) -> Result<String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(part_name) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?;

        if data.is_empty() {
            break;
        }

        return crate::handlers::store_upload(media_store, &data, file_name.as_deref()).await;
    }

    Err(AppError::Validation(format!("{part_name} file is required")))
}
