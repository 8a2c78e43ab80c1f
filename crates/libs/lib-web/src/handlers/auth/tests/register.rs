//! Registration endpoint tests.

use super::*;

#[tokio::test]
async fn test_register_success_returns_created_without_tokens() {
    let app = test_app().await;

    let (status, body) = post_multipart(&app, "/api/users/register", alice_form()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"]["avatar_url"].as_str().unwrap().contains("/media/"));
    // Registration does not open a session
    assert!(body.get("access_token").is_none());
    assert!(body.get("refresh_token").is_none());
    // Credentials never leave the server
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("refresh_token").is_none());
}

#[tokio::test]
async fn test_register_normalizes_username_and_email() {
    let app = test_app().await;

    let form = multipart_body(&[
        ("username", None, b"  Alice  "),
        ("email", None, b"ALICE@Example.COM"),
        ("full_name", None, b"Alice Anderson"),
        ("password", None, b"alice-pass-123"),
        ("avatar", Some("avatar.png"), b"png-bytes"),
    ]);
    let (status, body) = post_multipart(&app, "/api/users/register", form).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_register_missing_avatar_is_bad_request() {
    let app = test_app().await;

    let form = multipart_body(&[
        ("username", None, b"alice"),
        ("email", None, b"alice@example.com"),
        ("full_name", None, b"Alice Anderson"),
        ("password", None, b"alice-pass-123"),
    ]);
    let (status, body) = post_multipart(&app, "/api/users/register", form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "Validation");
}

#[tokio::test]
async fn test_register_short_password_is_bad_request() {
    let app = test_app().await;

    let form = multipart_body(&[
        ("username", None, b"alice"),
        ("email", None, b"alice@example.com"),
        ("full_name", None, b"Alice Anderson"),
        ("password", None, b"short"),
        ("avatar", Some("avatar.png"), b"png-bytes"),
    ]);
    let (status, body) = post_multipart(&app, "/api/users/register", form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "Validation");
}

#[tokio::test]
async fn test_register_duplicate_is_generic_conflict() {
    let app = test_app().await;

    let (status, _) = post_multipart(&app, "/api/users/register", alice_form()).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same username, different email, different case
    let form = multipart_body(&[
        ("username", None, b"ALICE"),
        ("email", None, b"other@example.com"),
        ("full_name", None, b"Other Person"),
        ("password", None, b"other-pass-123"),
        ("avatar", Some("avatar.png"), b"png-bytes"),
    ]);
    let (status, body) = post_multipart(&app, "/api/users/register", form).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
    // The error never names the colliding field
    assert!(!body["error"].as_str().unwrap().to_lowercase().contains("username"));
}

#[tokio::test]
async fn test_register_accepts_optional_cover_image() {
    let app = test_app().await;

    let form = multipart_body(&[
        ("username", None, b"bob"),
        ("email", None, b"bob@example.com"),
        ("full_name", None, b"Bob Brown"),
        ("password", None, b"bob-pass-1234"),
        ("avatar", Some("avatar.png"), b"png-bytes"),
        ("cover_image", Some("cover.jpg"), b"jpg-bytes"),
    ]);
    let (status, body) = post_multipart(&app, "/api/users/register", form).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"]["cover_image_url"].as_str().unwrap().contains("/media/"));
}
