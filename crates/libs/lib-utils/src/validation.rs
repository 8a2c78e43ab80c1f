//! # Validation Utilities
//!
//! Input validation helpers for user-supplied fields.

/// Validate that a string is not empty after trimming.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate email format (basic shape check, not RFC 5322).
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Validate minimum length.
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if value.len() < min {
        Err(format!("{} must be at least {} characters", field_name, min))
    } else {
        Ok(())
    }
}

/// Validate a username: 3+ chars, alphanumeric plus `_` and `-`.
pub fn validate_username(username: &str) -> Result<(), String> {
    let username = username.trim();
    validate_min_length(username, 3, "Username")?;
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err("Username may only contain letters, digits, '_' and '-'".to_string())
    }
}
