//! Order route handlers.
//!
//! Order creation drains the caller's cart inside one transaction; see
//! [`crate::db::orders::OrderRepository::create_from_cart`].

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;

use pomelo_core::{OrderId, UserId};

use crate::db::{OrderError, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::order::{NewOrder, Order, OrderLine};
use crate::state::AppState;

/// Build the orders router.
///
/// The first segment parameter is a user id on the collection route and an
/// order id on the items route; the router needs a single name for it.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}", get(list).post(create))
        .route("/orders/{id}/items", get(items))
}

/// Created-order payload with the success message clients expect.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub message: &'static str,
}

/// One order line as returned to clients.
#[derive(Debug, Serialize)]
pub struct OrderLineResponse {
    pub product: String,
    pub quantity: i32,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            product: line.product,
            quantity: line.quantity,
        }
    }
}

/// Create an order from the user's cart.
async fn create(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<NewOrder>,
) -> Result<(StatusCode, Json<CreateOrderResponse>)> {
    let order = OrderRepository::new(state.pool())
        .create_from_cart(user_id, &body)
        .await
        .map_err(|e| match e {
            OrderError::NoActiveCart | OrderError::EmptyCart => AppError::Domain(e.to_string()),
            OrderError::Repository(r) => AppError::Database(r),
        })?;

    tracing::info!(order_id = %order.id, user_id = %user_id, total = %order.total_price, "order created");

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order,
            message: "Order created successfully",
        }),
    ))
}

/// List the user's orders, newest first.
async fn list(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(orders))
}

/// List an order's lines.
async fn items(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Vec<OrderLineResponse>>> {
    let orders = OrderRepository::new(state.pool());

    orders
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No order with id {order_id}")))?;

    let lines = orders.lines(order_id).await?;

    Ok(Json(lines.into_iter().map(Into::into).collect()))
}
