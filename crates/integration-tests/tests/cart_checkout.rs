//! Integration tests for the cart and the cart-to-order transfer.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p pomelo-api)
//!
//! Run with: cargo test -p pomelo-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use pomelo_integration_tests::{
    add_to_cart, base_url, client, create_product, register_user, shipping_details, unique_name,
};

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_repeat_add_increments_quantity() {
    let client = client();
    let (user_id, token) = register_user(&client, &unique_name("alice")).await;
    let widget = unique_name("Widget");
    create_product(&client, &widget, "10.00").await;

    // First add sets the quantity, the second adds to it
    let line = add_to_cart(&client, &token, user_id, &widget, 2).await;
    assert_eq!(line["quantity"], 2);

    let line = add_to_cart(&client, &token, user_id, &widget, 3).await;
    assert_eq!(line["quantity"], 5);
    assert_eq!(line["total"], "50.00");

    // Still a single line in the cart
    let resp = client
        .get(format!("{}/cart/view/{user_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("view cart request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("cart body");
    let items = cart["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 5);
    assert_eq!(cart["total_price"], "50.00");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_view_empty_cart_is_ok() {
    let client = client();
    let (user_id, token) = register_user(&client, &unique_name("emma")).await;

    let resp = client
        .get(format!("{}/cart/view/{user_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("view cart request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart: Value = resp.json().await.expect("cart body");
    assert_eq!(cart["items"].as_array().expect("items array").len(), 0);
    assert_eq!(cart["total_price"], "0.00");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_unknown_product_not_found() {
    let client = client();
    let (user_id, token) = register_user(&client, &unique_name("frank")).await;

    let resp = client
        .post(format!("{}/cart/add/{user_id}", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "product": unique_name("NoSuchProduct"), "quantity": 1 }))
        .send()
        .await
        .expect("add request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_non_positive_quantity_rejected() {
    let client = client();
    let (user_id, token) = register_user(&client, &unique_name("gina")).await;
    let widget = unique_name("Widget");
    create_product(&client, &widget, "10.00").await;

    let resp = client
        .post(format!("{}/cart/add/{user_id}", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "product": widget, "quantity": 0 }))
        .send()
        .await
        .expect("add request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_remove_line_and_remove_absent_line() {
    let client = client();
    let (user_id, token) = register_user(&client, &unique_name("henry")).await;
    let widget = unique_name("Widget");
    let product_id = create_product(&client, &widget, "10.00").await;
    add_to_cart(&client, &token, user_id, &widget, 1).await;

    let resp = client
        .delete(format!("{}/cart/remove/{user_id}", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("remove request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Removing it again is an error, not a no-op
    let resp = client
        .delete(format!("{}/cart/remove/{user_id}", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("remove request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_cart_requires_bearer_token() {
    let client = client();
    let (user_id, _token) = register_user(&client, &unique_name("iris")).await;

    let resp = client
        .get(format!("{}/cart/view/{user_id}", base_url()))
        .send()
        .await
        .expect("view cart request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_drains_cart_and_freezes_total() {
    let client = client();
    let (user_id, token) = register_user(&client, &unique_name("alice")).await;
    let widget = unique_name("Widget");
    let gadget = unique_name("Gadget");
    create_product(&client, &widget, "10.00").await;
    create_product(&client, &gadget, "3.50").await;

    add_to_cart(&client, &token, user_id, &widget, 5).await;
    add_to_cart(&client, &token, user_id, &gadget, 1).await;

    // Widget(5 x 10.00) + Gadget(1 x 3.50) = 53.50
    let resp = client
        .post(format!("{}/orders/{user_id}", base_url()))
        .bearer_auth(&token)
        .json(&shipping_details())
        .send()
        .await
        .expect("create order request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Value = resp.json().await.expect("order body");
    assert_eq!(order["total_price"], "53.50");
    assert_eq!(order["order_status"], "Processing");
    assert_eq!(order["payment_status"], "Unpaid");
    assert_eq!(order["payment_method"], "Cash");
    assert_eq!(order["message"], "Order created successfully");
    let order_id = order["id"].as_i64().expect("order id");

    // Two snapshot lines
    let resp = client
        .get(format!("{}/orders/{order_id}/items", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("order items request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Value = resp.json().await.expect("items body");
    assert_eq!(items.as_array().expect("items array").len(), 2);

    // The cart survives, empty
    let resp = client
        .get(format!("{}/cart/view/{user_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("view cart request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("cart body");
    assert_eq!(cart["items"].as_array().expect("items array").len(), 0);

    // Later price edits don't touch the frozen total
    let resp = client
        .get(format!("{}/orders/{user_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("list orders request failed");
    let orders: Value = resp.json().await.expect("orders body");
    assert_eq!(orders[0]["total_price"], "53.50");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_total_unaffected_by_later_price_change() {
    let client = client();
    let (user_id, token) = register_user(&client, &unique_name("judy")).await;
    let widget = unique_name("Widget");
    let product_id = create_product(&client, &widget, "10.00").await;

    add_to_cart(&client, &token, user_id, &widget, 2).await;

    let resp = client
        .post(format!("{}/orders/{user_id}", base_url()))
        .bearer_auth(&token)
        .json(&shipping_details())
        .send()
        .await
        .expect("create order request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("order body");
    let order_id = order["id"].as_i64().expect("order id");
    assert_eq!(order["total_price"], "20.00");

    // Double the catalog price
    let resp = client
        .put(format!("{}/products/{product_id}", base_url()))
        .json(&json!({ "price": "20.00" }))
        .send()
        .await
        .expect("update product request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // The order's total is frozen
    let resp = client
        .get(format!("{}/orders/{user_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("list orders request failed");
    let orders: Value = resp.json().await.expect("orders body");
    let frozen = orders
        .as_array()
        .expect("orders array")
        .iter()
        .find(|o| o["id"].as_i64() == Some(order_id))
        .expect("order present");
    assert_eq!(frozen["total_price"], "20.00");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_from_empty_cart_fails() {
    let client = client();
    let (user_id, token) = register_user(&client, &unique_name("kate")).await;

    let resp = client
        .post(format!("{}/orders/{user_id}", base_url()))
        .bearer_auth(&token)
        .json(&shipping_details())
        .send()
        .await
        .expect("create order request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // No order was created
    let resp = client
        .get(format!("{}/orders/{user_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("list orders request failed");
    let orders: Value = resp.json().await.expect("orders body");
    assert_eq!(orders.as_array().expect("orders array").len(), 0);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_unknown_order_items_not_found() {
    let client = client();
    let (_user_id, token) = register_user(&client, &unique_name("liam")).await;

    let resp = client
        .get(format!("{}/orders/999999999/items", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("order items request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
