//! # User Repository
//!
//! Database access layer for user records (the credential store).
//!
//! Implements the repository pattern over SQL queries. Refresh-token state
//! transitions go through three dedicated methods:
//!
//! - [`UserRepository::set_refresh_token`] — login, unconditional overwrite
//! - [`UserRepository::rotate_refresh_token`] — refresh, atomic conditional
//!   swap keyed by the previous token value
//! - [`UserRepository::clear_refresh_token`] — logout, idempotent
//!
//! The conditional swap is what serializes concurrent refreshes for the same
//! account: of two racing rotations, exactly one matches the stored value.

use super::models::{User, UserForCreate, UserForUpdate};
use super::DbPool;
use sqlx::query_as;

/// User repository for database operations.
///
/// All methods are async and return `Result` types for proper error handling.
pub struct UserRepository;

impl UserRepository {
    /// Find a user by id.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username or email, case-insensitively.
    ///
    /// A single identifier is matched against both columns, mirroring the
    /// login form where either is accepted.
    pub async fn find_by_username_or_email(
        pool: &DbPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let identifier = identifier.trim();
        query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER(?1) OR LOWER(email) = LOWER(?1)",
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await
    }

    /// Create a new user in the database.
    ///
    /// Username and email are stored trimmed and lowercased so the unique
    /// indexes enforce case-insensitive uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the username or email already exists
    /// (UNIQUE constraint violation) or the database is unavailable.
    pub async fn create(pool: &DbPool, user_data: UserForCreate) -> Result<User, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, full_name, avatar_url, cover_image_url, password_hash) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_data.username.trim().to_lowercase())
        .bind(user_data.email.trim().to_lowercase())
        .bind(user_data.full_name.trim())
        .bind(&user_data.avatar_url)
        .bind(&user_data.cover_image_url)
        .bind(&user_data.password_hash)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();

        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Update an existing user using `UserForUpdate`.
    ///
    /// Only fields that are `Some` in `user_data` will be updated.
    pub async fn update(
        pool: &DbPool,
        id: i64,
        user_data: UserForUpdate,
    ) -> Result<User, sqlx::Error> {
        if user_data.is_empty() {
            // No updates, just return the existing user
            return query_as::<_, User>("SELECT * FROM users WHERE id = ?")
                .bind(id)
                .fetch_one(pool)
                .await;
        }

        // Build update query dynamically
        let mut updates = Vec::new();

        if user_data.username.is_some() {
            updates.push("username = ?");
        }
        if user_data.email.is_some() {
            updates.push("email = ?");
        }
        if user_data.full_name.is_some() {
            updates.push("full_name = ?");
        }
        if user_data.avatar_url.is_some() {
            updates.push("avatar_url = ?");
        }
        if user_data.cover_image_url.is_some() {
            updates.push("cover_image_url = ?");
        }
        if user_data.password_hash.is_some() {
            updates.push("password_hash = ?");
        }

        updates.push("updated_at = CURRENT_TIMESTAMP");
        let query_str = format!("UPDATE users SET {} WHERE id = ?", updates.join(", "));

        let mut query = sqlx::query(&query_str);

        if let Some(ref username) = user_data.username {
            query = query.bind(username.trim().to_lowercase());
        }
        if let Some(ref email) = user_data.email {
            query = query.bind(email.trim().to_lowercase());
        }
        if let Some(ref full_name) = user_data.full_name {
            query = query.bind(full_name.trim().to_string());
        }
        if let Some(ref avatar_url) = user_data.avatar_url {
            query = query.bind(avatar_url);
        }
        if let Some(ref cover_image_url) = user_data.cover_image_url {
            query = query.bind(cover_image_url);
        }
        if let Some(ref password_hash) = user_data.password_hash {
            query = query.bind(password_hash);
        }

        query.bind(id).execute(pool).await?;

        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Persist a freshly issued refresh token, overwriting any prior value.
    ///
    /// Login path: every previously issued refresh token for this account
    /// becomes unusable.
    pub async fn set_refresh_token(
        pool: &DbPool,
        id: i64,
        token: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET refresh_token = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(token)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Atomically swap the stored refresh token from `current` to `next`.
    ///
    /// Returns `false` when the stored value no longer equals `current`
    /// (a concurrent rotation or logout won the race), in which case no
    /// write happens and the caller must reject the presented token.
    pub async fn rotate_refresh_token(
        pool: &DbPool,
        id: i64,
        current: &str,
        next: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = ?, updated_at = CURRENT_TIMESTAMP \
             WHERE id = ? AND refresh_token = ?",
        )
        .bind(next)
        .bind(id)
        .bind(current)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Clear the stored refresh token. Idempotent; clearing an already
    /// cleared token succeeds.
    pub async fn clear_refresh_token(pool: &DbPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET refresh_token = NULL, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Update the last login timestamp for a user.
    ///
    /// Does not verify that the user exists; an unknown id updates no rows.
    pub async fn update_last_login(pool: &DbPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete all users from the database.
    ///
    /// **WARNING**: destructive and irreversible. Used by the clear-users
    /// dev utility only.
    pub async fn delete_all(pool: &DbPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
