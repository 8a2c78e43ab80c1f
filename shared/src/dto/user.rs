use serde::{Deserialize, Serialize};

use super::auth::UserInfo;

/// Profile update request. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Password change request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Response wrapping an updated user record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub user: UserInfo,
    pub message: String,
}

/// Plain acknowledgement (logout, password change)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiMessage {
    pub message: String,
}
