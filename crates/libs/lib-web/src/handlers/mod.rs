//! # HTTP Handlers
//!
//! Request handlers for the user-account API.
//!
//! ## Modules
//!
//! - **[`auth`]**: registration, login, logout, and token refresh
//! - **[`user`]**: profile reads and updates for the authenticated user

// region: --- Modules
pub mod auth;
pub mod user;
// endregion: --- Modules

use lib_core::model::store::User;
use lib_core::Result;
use lib_utils::format_time;
use shared::UserInfo;
use std::sync::Arc;

use crate::services::{media, MediaStore};

/// Project a stored user row into its public representation.
///
/// The password hash and stored refresh token never leave the server.
pub fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        avatar_url: user.avatar_url.clone(),
        cover_image_url: user.cover_image_url.clone(),
        created_at: format_time(user.created_at),
    }
}

/// Stage uploaded bytes and persist them, cleaning up the staged file if
/// the store rejects it.
pub(crate) async fn store_upload(
    media_store: &Arc<dyn MediaStore>,
    data: &[u8],
    original_name: Option<&str>,
) -> Result<String> {
    let staged = media::stage_upload(data, original_name).await?;
    match media_store.store(&staged).await {
        Ok(url) => Ok(url),
        Err(e) => {
            media::discard_staged(&staged).await;
            Err(e)
        }
    }
}
