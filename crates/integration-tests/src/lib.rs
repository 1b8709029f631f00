//! Integration tests for Pomelo.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and apply migrations
//! cargo run -p pomelo-cli -- migrate
//!
//! # Start the API server
//! cargo run -p pomelo-api
//!
//! # Run the (ignored-by-default) integration tests
//! cargo test -p pomelo-integration-tests -- --ignored
//! ```
//!
//! Tests create their own uniquely named users and products, so they can
//! run repeatedly against the same database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("POMELO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// A unique name for a throwaway user or product.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Register a fresh user and return `(user_id, access_token)`.
///
/// # Panics
///
/// Panics if registration does not succeed with 201.
pub async fn register_user(client: &Client, username: &str) -> (i64, String) {
    let resp = client
        .post(format!("{}/users/register", base_url()))
        .json(&json!({ "username": username, "password": "integration-pass" }))
        .send()
        .await
        .expect("register request failed");

    assert_eq!(resp.status(), 201, "registration should succeed");
    let body: Value = resp.json().await.expect("register response body");

    let user_id = body["user"]["id"].as_i64().expect("user id");
    let access_token = body["access_token"]
        .as_str()
        .expect("access token")
        .to_string();

    (user_id, access_token)
}

/// Create a product and return its id.
///
/// # Panics
///
/// Panics if creation does not succeed with 201.
pub async fn create_product(client: &Client, name: &str, price: &str) -> i64 {
    let resp = client
        .post(format!("{}/products", base_url()))
        .json(&json!({ "name": name, "price": price }))
        .send()
        .await
        .expect("create product request failed");

    assert_eq!(resp.status(), 201, "product creation should succeed");
    let body: Value = resp.json().await.expect("product response body");
    body["id"].as_i64().expect("product id")
}

/// Add `quantity` of a product (by name) to a user's cart.
///
/// # Panics
///
/// Panics if the add does not succeed with 200.
pub async fn add_to_cart(
    client: &Client,
    token: &str,
    user_id: i64,
    product: &str,
    quantity: i64,
) -> Value {
    let resp = client
        .post(format!("{}/cart/add/{user_id}", base_url()))
        .bearer_auth(token)
        .json(&json!({ "product": product, "quantity": quantity }))
        .send()
        .await
        .expect("add to cart request failed");

    assert_eq!(resp.status(), 200, "add to cart should succeed");
    resp.json().await.expect("cart line body")
}

/// Standard shipping details used by order tests.
#[must_use]
pub fn shipping_details() -> Value {
    json!({
        "country": "Freedonia",
        "city": "Fredville",
        "state": "Central",
        "street": "1 Main St",
        "phone": "+1-555-0100",
        "zip_code": "00100"
    })
}
