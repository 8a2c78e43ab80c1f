//! # Application Configuration
//!
//! Configuration loaded from environment variables and validated on startup
//! to fail fast if misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance after a
//! single [`init_config()`] call at startup.
//!
//! Token signing secrets never leave this struct implicitly: the token layer
//! receives an explicit [`TokenConfig`] built by [`Config::token_config`].

use lib_auth::TokenConfig;
use lib_utils::{get_env, get_env_parse};
use std::sync::OnceLock;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for access token signing and verification.
    ///
    /// **Must be at least 32 characters long.**
    pub access_token_secret: String,

    /// Secret key for refresh token signing and verification.
    ///
    /// Must be at least 32 characters long and differ from the access secret.
    pub refresh_token_secret: String,

    /// Access token validity in minutes (default 15).
    pub access_token_expiry_minutes: i64,

    /// Refresh token validity in days (default 7).
    pub refresh_token_expiry_days: i64,

    /// Directory where uploaded media files are persisted.
    pub media_root: String,

    /// Public base URL under which persisted media is served.
    pub media_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            get_env("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/vidtube.db".to_string());

        let access_token_secret =
            get_env("ACCESS_TOKEN_SECRET").map_err(|_| "ACCESS_TOKEN_SECRET must be set")?;

        let refresh_token_secret =
            get_env("REFRESH_TOKEN_SECRET").map_err(|_| "REFRESH_TOKEN_SECRET must be set")?;

        let access_token_expiry_minutes = match get_env_parse::<i64>("ACCESS_TOKEN_EXPIRY_MINUTES")
        {
            Ok(v) => v,
            Err(lib_utils::envs::Error::MissingEnv(_)) => 15,
            Err(_) => return Err("ACCESS_TOKEN_EXPIRY_MINUTES must be a valid number".to_string()),
        };

        let refresh_token_expiry_days = match get_env_parse::<i64>("REFRESH_TOKEN_EXPIRY_DAYS") {
            Ok(v) => v,
            Err(lib_utils::envs::Error::MissingEnv(_)) => 7,
            Err(_) => return Err("REFRESH_TOKEN_EXPIRY_DAYS must be a valid number".to_string()),
        };

        let media_root = get_env("MEDIA_ROOT").unwrap_or_else(|_| "data/media".to_string());
        let media_base_url =
            get_env("MEDIA_BASE_URL").unwrap_or_else(|_| "http://localhost:3001/media".to_string());

        Ok(Self {
            database_url,
            access_token_secret,
            refresh_token_secret,
            access_token_expiry_minutes,
            refresh_token_expiry_days,
            media_root,
            media_base_url,
        })
    }

    /// Validate configuration values against security and business rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.access_token_secret.len() < 32 {
            return Err("ACCESS_TOKEN_SECRET must be at least 32 characters long".to_string());
        }

        if self.refresh_token_secret.len() < 32 {
            return Err("REFRESH_TOKEN_SECRET must be at least 32 characters long".to_string());
        }

        if self.access_token_secret == self.refresh_token_secret {
            return Err("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ".to_string());
        }

        if self.access_token_expiry_minutes < 1 || self.access_token_expiry_minutes > 1440 {
            return Err("ACCESS_TOKEN_EXPIRY_MINUTES must be between 1 and 1440".to_string());
        }

        if self.refresh_token_expiry_days < 1 || self.refresh_token_expiry_days > 90 {
            return Err("REFRESH_TOKEN_EXPIRY_DAYS must be between 1 and 90".to_string());
        }

        Ok(())
    }

    /// Build the token layer's explicit signing configuration.
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            access_secret: self.access_token_secret.clone(),
            refresh_secret: self.refresh_token_secret.clone(),
            access_expiry_minutes: self.access_token_expiry_minutes,
            refresh_expiry_days: self.refresh_token_expiry_days,
        }
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// Call once at application startup, before any handler or middleware that
/// needs configuration runs.
///
/// # Errors
///
/// Returns an error if environment variables are missing or invalid, if
/// validation fails, or if the config has already been initialized.
pub fn init_config() -> Result<(), String> {
    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            access_token_secret: "access-test-secret-at-least-32-chars-long!!".to_string(),
            refresh_token_secret: "refresh-test-secret-at-least-32-chars-long!".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
            media_root: "data/media".to_string(),
            media_base_url: "http://localhost:3001/media".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut config = valid_config();
        config.access_token_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_shared_secret() {
        let mut config = valid_config();
        config.refresh_token_secret = config.access_token_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_expiry_out_of_range() {
        let mut config = valid_config();
        config.access_token_expiry_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.refresh_token_expiry_days = 365;
        assert!(config.validate().is_err());
    }
}
