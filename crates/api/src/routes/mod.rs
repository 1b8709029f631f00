//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (DB ping)
//!
//! # Identity
//! POST /users/register          - Create account + cart, issue tokens
//! POST /users/login             - Issue tokens
//! POST /users/refresh           - Rotate a token pair
//!
//! # Catalog
//! GET    /products              - List/search/sort products
//! POST   /products              - Create product
//! GET    /products/{id}         - Product detail
//! PUT    /products/{id}         - Update name/price
//! DELETE /products/{id}         - Delete product
//!
//! # Cart (requires bearer token)
//! GET    /cart/view/{user_id}   - List cart lines + total
//! POST   /cart/add/{user_id}    - Add or increment a line
//! DELETE /cart/remove/{user_id} - Remove a line
//!
//! # Orders (requires bearer token)
//! POST /orders/{user_id}        - Drain the cart into a new order
//! GET  /orders/{user_id}        - List the user's orders
//! GET  /orders/{order_id}/items - List an order's lines
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the application router (everything except health checks).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router())
}
