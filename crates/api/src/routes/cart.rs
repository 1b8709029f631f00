//! Cart route handlers.
//!
//! All cart routes require a bearer token; data scoping follows the
//! `user_id` path segment.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete as delete_route, get, post},
};
use serde::{Deserialize, Serialize};

use pomelo_core::{Money, ProductId, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::cart::{self, CartLine};
use crate::state::AppState;

/// Build the cart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart/view/{user_id}", get(view))
        .route("/cart/add/{user_id}", post(add))
        .route("/cart/remove/{user_id}", delete_route(remove))
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Product name (products are addressed by name here).
    pub product: String,
    /// Units to add; defaults to 1.
    pub quantity: Option<i32>,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product_id: ProductId,
}

/// One cart line as returned to clients.
#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub product: String,
    pub quantity: i32,
    pub unit_price: Money,
    pub total: Money,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        let total = cart::line_total(&line);
        Self {
            product: line.product,
            quantity: line.quantity,
            unit_price: line.unit_price,
            total,
        }
    }
}

/// Cart contents as returned to clients.
#[derive(Debug, Serialize)]
pub struct CartViewResponse {
    pub items: Vec<CartLineResponse>,
    pub total_price: Money,
}

/// List the cart's lines and computed total.
///
/// An empty cart is a 200 with an empty `items` array; only a missing cart
/// is a 404.
async fn view(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<CartViewResponse>> {
    let carts = CartRepository::new(state.pool());

    let cart = carts
        .get_by_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

    let lines = carts.lines(cart.id).await?;
    let total_price = cart::total(&lines);

    Ok(Json(CartViewResponse {
        items: lines.into_iter().map(Into::into).collect(),
        total_price,
    }))
}

/// Add a product to the cart, or bump its existing line.
async fn add(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartLineResponse>> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::Validation("quantity must be positive".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .get_by_name(&body.product)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No product named {:?}", body.product)))?;

    let new_quantity = CartRepository::new(state.pool())
        .add_line(user_id, product.id, quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Cart not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(CartLineResponse {
        total: product.price * new_quantity,
        product: product.name,
        quantity: new_quantity,
        unit_price: product.price,
    }))
}

/// Remove a product's line from the cart.
async fn remove(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<RemoveItemRequest>,
) -> Result<StatusCode> {
    CartRepository::new(state.pool())
        .remove_line(user_id, body.product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("No matching item in cart".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
