//! # Account API Tests
//!
//! End-to-end tests for the account/session endpoints, driving the full
//! router (middleware included) against an in-memory database.

mod register;
mod refresh;

use crate::server::{create_router, AppState};
use crate::services::LocalMediaStore;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use lib_core::{Config, DbPool};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

pub const BOUNDARY: &str = "X-TEST-BOUNDARY";

/// Setup test database with schema
pub async fn setup_test_db() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE COLLATE NOCASE,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            full_name TEXT NOT NULL,
            avatar_url TEXT NOT NULL,
            cover_image_url TEXT,
            password_hash TEXT NOT NULL,
            refresh_token TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            last_login TIMESTAMP
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create users table");

    pool
}

/// Create test config
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        access_token_secret: "access-test-secret-at-least-32-chars-long!!".to_string(),
        refresh_token_secret: "refresh-test-secret-at-least-32-chars-long!".to_string(),
        access_token_expiry_minutes: 15,
        refresh_token_expiry_days: 7,
        media_root: std::env::temp_dir()
            .join("handler-test-media")
            .to_string_lossy()
            .into_owned(),
        media_base_url: "http://localhost:3001/media".to_string(),
    }
}

/// Build the full application router over a fresh in-memory database.
pub async fn test_app() -> Router {
    let pool = setup_test_db().await;
    let config = test_config();
    let media = Arc::new(LocalMediaStore::new(
        &config.media_root,
        &config.media_base_url,
    ));
    let media_root = config.media_root.clone();
    let state = AppState::new(pool, config, media);
    create_router(state, &media_root, vec![])
}

/// Build a multipart body from (name, filename, content) parts.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Standard registration form for "alice", with avatar.
pub fn alice_form() -> Vec<u8> {
    multipart_body(&[
        ("username", None, b"alice"),
        ("email", None, b"alice@example.com"),
        ("full_name", None, b"Alice Anderson"),
        ("password", None, b"alice-pass-123"),
        ("avatar", Some("avatar.png"), b"png-bytes"),
    ])
}

/// POST a multipart body to the given path.
pub async fn post_multipart(app: &Router, path: &str, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

/// POST a JSON body to the given path, optionally with a bearer token.
pub async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    bearer: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    send(app, req).await
}

/// Dispatch a request and decode the JSON response body.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Register alice and log her in, returning (access_token, refresh_token).
pub async fn register_and_login(app: &Router) -> (String, String) {
    let (status, _) = post_multipart(app, "/api/users/register", alice_form()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        app,
        "/api/users/login",
        serde_json::json!({ "username_or_email": "alice", "password": "alice-pass-123" }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}
