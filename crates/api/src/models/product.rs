//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pomelo_core::{Money, ProductId};

/// A sellable catalog item.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name, unique across the catalog (cart adds address products by name).
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
