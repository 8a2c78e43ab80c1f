//! Refresh-token endpoint tests: rotation, revocation, and cookie fallback.

use super::*;

#[tokio::test]
async fn test_refresh_from_body_rotates_token() {
    let app = test_app().await;
    let (_, refresh_token) = register_and_login(&app).await;

    let (status, body) = post_json(
        &app,
        "/api/users/refresh-token",
        serde_json::json!({ "refresh_token": refresh_token }),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rotated = body["refresh_token"].as_str().unwrap();
    assert_ne!(rotated, refresh_token);

    // The superseded token is dead
    let (status, body) = post_json(
        &app,
        "/api/users/refresh-token",
        serde_json::json!({ "refresh_token": refresh_token }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TokenMismatch");

    // The rotated token works
    let (status, _) = post_json(
        &app,
        "/api/users/refresh-token",
        serde_json::json!({ "refresh_token": rotated }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_from_cookie_when_body_absent() {
    let app = test_app().await;
    let (_, refresh_token) = register_and_login(&app).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/users/refresh-token")
        .header(header::COOKIE, format!("refresh_token={refresh_token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["refresh_token"].as_str().is_some());
}

#[tokio::test]
async fn test_refresh_body_wins_over_cookie() {
    let app = test_app().await;
    let (_, refresh_token) = register_and_login(&app).await;

    // Body carries garbage; the valid cookie must not rescue the request
    let req = Request::builder()
        .method("POST")
        .uri("/api/users/refresh-token")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("refresh_token={refresh_token}"))
        .body(Body::from(
            serde_json::json!({ "refresh_token": "not-a-jwt" }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TokenInvalid");
}

#[tokio::test]
async fn test_refresh_without_token_is_unauthorized() {
    let app = test_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/users/refresh-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TokenInvalid");
}

#[tokio::test]
async fn test_refresh_sets_fresh_cookies() {
    let app = test_app().await;
    let (_, refresh_token) = register_and_login(&app).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/users/refresh-token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "refresh_token": refresh_token }).to_string(),
        ))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let cookies: Vec<String> = res
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
}
