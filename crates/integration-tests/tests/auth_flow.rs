//! Integration tests for registration, login, and token refresh.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p pomelo-api)
//!
//! Run with: cargo test -p pomelo-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use pomelo_integration_tests::{base_url, client, register_user, unique_name};

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_register_then_login() {
    let client = client();
    let username = unique_name("alice");

    let (user_id, _token) = register_user(&client, &username).await;
    assert!(user_id > 0);

    // Login with the password
    let resp = client
        .post(format!("{}/users/login", base_url()))
        .json(&json!({ "username": username, "password": "integration-pass" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("login body");
    assert_eq!(body["user"]["username"], username.as_str());
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refresh_token"].as_str().is_some_and(|t| !t.is_empty()));

    // The legacy contract: login without a password also succeeds
    let resp = client
        .post(format!("{}/users/login", base_url()))
        .json(&json!({ "username": username }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_login_wrong_password_unauthorized() {
    let client = client();
    let username = unique_name("mallory");
    register_user(&client, &username).await;

    let resp = client
        .post(format!("{}/users/login", base_url()))
        .json(&json!({ "username": username, "password": "not-the-password" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_duplicate_registration_conflict() {
    let client = client();
    let username = unique_name("bob");

    register_user(&client, &username).await;

    let resp = client
        .post(format!("{}/users/register", base_url()))
        .json(&json!({ "username": username, "password": "another-pass-123" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // First user's login is unaffected
    let resp = client
        .post(format!("{}/users/login", base_url()))
        .json(&json!({ "username": username, "password": "integration-pass" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_login_unknown_user_not_found() {
    let client = client();

    let resp = client
        .post(format!("{}/users/login", base_url()))
        .json(&json!({ "username": unique_name("unknown_user") }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_weak_password_rejected() {
    let client = client();

    let resp = client
        .post(format!("{}/users/register", base_url()))
        .json(&json!({ "username": unique_name("carol"), "password": "short" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_refresh_rotates_tokens() {
    let client = client();
    let username = unique_name("dave");

    let resp = client
        .post(format!("{}/users/register", base_url()))
        .json(&json!({ "username": username, "password": "integration-pass" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("register body");
    let old_refresh = body["refresh_token"].as_str().expect("refresh token");

    let resp = client
        .post(format!("{}/users/refresh", base_url()))
        .json(&json!({ "refresh_token": old_refresh }))
        .send()
        .await
        .expect("refresh request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated: Value = resp.json().await.expect("refresh body");
    assert_ne!(rotated["refresh_token"].as_str(), Some(old_refresh));

    // The old refresh token was rotated away
    let resp = client
        .post(format!("{}/users/refresh", base_url()))
        .json(&json!({ "refresh_token": old_refresh }))
        .send()
        .await
        .expect("refresh request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
