//! # Session Service
//!
//! Registration, login, logout, token refresh, and password changes.
//!
//! This is the only writer of the stored refresh token. The stored value is
//! the single source of truth for "is this refresh token still valid":
//!
//! - **login** overwrites it with a fresh token (any prior token dies)
//! - **refresh** rotates it with an atomic compare-and-swap; the presented
//!   token must equal the stored one byte-for-byte, and the superseded token
//!   becomes permanently unusable even if it has not expired
//! - **logout** clears it, after which every outstanding refresh token fails
//!
//! A cryptographically valid refresh token that does not match the stored
//! value is rejected with `TokenMismatch` - that is what makes logout and
//! rotation actually revoke access rather than merely deleting a cookie.

use lib_auth::{
    decode_refresh_token, hash_password, issue_access_token, issue_refresh_token, verify_password,
    TokenConfig,
};
use lib_core::model::store::{User, UserForCreate, UserForUpdate, UserRepository};
use lib_core::{AppError, Config, DbPool, Result};
use lib_utils::{validate_email, validate_not_empty, validate_username};
use shared::TokenPair;
use tracing::{debug, info, warn};

/// Input for account registration. The avatar has already been uploaded to
/// durable media storage by the time this is built.
///
/// Deliberately not `Debug`: carries the plaintext password.
#[derive(Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

/// Session lifecycle service over the credential store and token issuer.
#[derive(Clone)]
pub struct SessionService {
    pool: DbPool,
    tokens: TokenConfig,
}

impl SessionService {
    pub fn new(pool: DbPool, tokens: TokenConfig) -> Self {
        Self { pool, tokens }
    }

    pub fn from_config(pool: DbPool, config: &Config) -> Self {
        Self::new(pool, config.token_config())
    }

    /// Register a new account.
    ///
    /// Fails with `Validation` on malformed input and with a generic
    /// `Conflict` when the username or email is already taken - the message
    /// never reveals which field collided.
    pub async fn register(&self, input: RegisterInput) -> Result<User> {
        validate_username(&input.username).map_err(AppError::Validation)?;
        validate_email(&input.email).map_err(AppError::Validation)?;
        validate_not_empty(&input.full_name, "Full name").map_err(AppError::Validation)?;
        validate_not_empty(&input.avatar_url, "Avatar").map_err(AppError::Validation)?;

        // Pre-check both fields; the unique indexes are the authoritative
        // guard against races and map to the same generic Conflict.
        if UserRepository::find_by_username_or_email(&self.pool, &input.username)
            .await?
            .is_some()
            || UserRepository::find_by_username_or_email(&self.pool, &input.email)
                .await?
                .is_some()
        {
            warn!("[REGISTER] Duplicate username or email");
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let user = UserRepository::create(
            &self.pool,
            UserForCreate {
                username: input.username,
                email: input.email,
                full_name: input.full_name,
                avatar_url: input.avatar_url,
                cover_image_url: input.cover_image_url,
                password_hash,
            },
        )
        .await?;

        info!("[REGISTER] User created (id: {})", user.id);
        Ok(user)
    }

    /// Authenticate and open a session.
    ///
    /// Issues a fresh access/refresh pair and persists the refresh token on
    /// the account, overwriting any prior value.
    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<(User, TokenPair)> {
        let user = UserRepository::find_by_username_or_email(&self.pool, username_or_email)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            warn!("[LOGIN] Invalid password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let pair = self.issue_pair(&user)?;

        UserRepository::set_refresh_token(&self.pool, user.id, &pair.refresh_token).await?;
        if let Err(e) = UserRepository::update_last_login(&self.pool, user.id).await {
            debug!("[LOGIN] Failed to stamp last_login for {}: {}", user.id, e);
        }

        info!("[LOGIN] Session opened for user {}", user.id);
        Ok((user, pair))
    }

    /// Validate a presented refresh token and rotate it.
    ///
    /// The old token becomes permanently unusable. Of two concurrent
    /// refreshes with the same token, the compare-and-swap lets exactly one
    /// succeed; the loser fails with `TokenMismatch`.
    pub async fn refresh(&self, presented: &str) -> Result<TokenPair> {
        let claims = decode_refresh_token(presented, &self.tokens)?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::TokenInvalid("malformed subject claim".to_string()))?;

        let user = UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        // Byte-for-byte comparison against the stored token. Covers
        // logout-then-reuse and superseded tokens from earlier rotations.
        if user.refresh_token.as_deref() != Some(presented) {
            warn!("[REFRESH] Presented token does not match stored token for user {}", user.id);
            return Err(AppError::TokenMismatch);
        }

        let pair = self.issue_pair(&user)?;

        let rotated =
            UserRepository::rotate_refresh_token(&self.pool, user.id, presented, &pair.refresh_token)
                .await?;
        if !rotated {
            // A concurrent refresh or logout won between the read and the swap.
            warn!("[REFRESH] Lost rotation race for user {}", user.id);
            return Err(AppError::TokenMismatch);
        }

        debug!("[REFRESH] Rotated refresh token for user {}", user.id);
        Ok(pair)
    }

    /// Close the session: clear the stored refresh token. Idempotent.
    pub async fn logout(&self, user_id: i64) -> Result<()> {
        UserRepository::clear_refresh_token(&self.pool, user_id).await?;
        info!("[LOGOUT] Session closed for user {}", user_id);
        Ok(())
    }

    /// Change the account password.
    ///
    /// The only path that re-hashes: the plaintext actually changed.
    pub async fn change_password(&self, user_id: i64, old: &str, new: &str) -> Result<()> {
        let user = UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        if !verify_password(old, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = hash_password(new)?;
        UserRepository::update(
            &self.pool,
            user.id,
            UserForUpdate::new().password_hash(password_hash),
        )
        .await?;

        info!("[PASSWORD] Password changed for user {}", user_id);
        Ok(())
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair> {
        let access_token = issue_access_token(
            &self.tokens,
            user.id,
            &user.email,
            &user.username,
            &user.full_name,
        )?;
        let refresh_token = issue_refresh_token(&self.tokens, user.id)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
