//! Order domain types.
//!
//! Orders are immutable snapshots of a drained cart: the line items and the
//! frozen `total_price` never change after creation, regardless of later
//! catalog price edits. Only the status fields may transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pomelo_core::{Money, OrderId, OrderLineId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId};

/// A completed purchase.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    pub country: String,
    pub city: String,
    pub state: String,
    pub street: String,
    pub phone: String,
    pub zip_code: String,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    /// Sum of `quantity * unit_price` over the lines, frozen at creation.
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One order line joined with its product's name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderLine {
    /// Unique line ID.
    pub id: OrderLineId,
    /// Order this line belongs to.
    pub order_id: OrderId,
    /// Product referenced by this line.
    pub product_id: ProductId,
    /// Product name at read time.
    pub product: String,
    /// Units purchased, copied from the cart line at creation.
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shipping and payment details supplied when placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub country: String,
    pub city: String,
    pub state: String,
    pub street: String,
    pub phone: String,
    #[serde(default)]
    pub zip_code: String,
    /// Defaults to `Cash` when omitted.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}
