use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

/// Token refresh request.
///
/// The refresh token may alternatively arrive via the `refresh_token`
/// cookie; when both are present the body wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Freshly issued access/refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication response (login success)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub user: UserInfo,
    pub access_token: String,
    pub refresh_token: String,
    pub message: String,
}

/// Registration response (no tokens - the new account still has to log in)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    pub user: UserInfo,
    pub message: String,
}

/// User information (public, safe to send to client).
///
/// Never carries the password hash or the stored refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub created_at: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
