use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// User entity representing a complete user record from the database.
///
/// This is the internal representation only. `password_hash` and
/// `refresh_token` must never cross the API boundary; outward-facing code
/// converts to the `shared::UserInfo` DTO instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub password_hash: String,
    /// Most recently issued refresh token, or NULL after logout.
    /// The single source of truth for "is this refresh token still valid".
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Data required to create a new user.
///
/// Password must already be hashed; `avatar_url` must already point at
/// durable media storage.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub password_hash: String,
}

/// Data structure for updating an existing user.
///
/// All fields are optional - only provided fields will be updated.
#[derive(Debug, Clone, Default)]
pub struct UserForUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub password_hash: Option<String>,
}

impl UserForUpdate {
    /// Create a new empty `UserForUpdate` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the username.
    pub fn username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the email.
    pub fn email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    /// Set the full name.
    pub fn full_name(mut self, full_name: String) -> Self {
        self.full_name = Some(full_name);
        self
    }

    /// Set the avatar URL.
    pub fn avatar_url(mut self, avatar_url: String) -> Self {
        self.avatar_url = Some(avatar_url);
        self
    }

    /// Set the cover image URL.
    pub fn cover_image_url(mut self, cover_image_url: String) -> Self {
        self.cover_image_url = Some(cover_image_url);
        self
    }

    /// Set the password hash. The only path that may change it.
    pub fn password_hash(mut self, password_hash: String) -> Self {
        self.password_hash = Some(password_hash);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.avatar_url.is_none()
            && self.cover_image_url.is_none()
            && self.password_hash.is_none()
    }
}
