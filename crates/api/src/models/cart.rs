//! Cart domain types and total computation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pomelo_core::{CartId, CartLineId, Money, ProductId, UserId};

/// A user's shopping cart.
///
/// Exactly one exists per user; it is provisioned inside the registration
/// transaction and survives (empty) when drained into an order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}

/// One cart line joined with its product's name and current unit price.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    /// Unique line ID.
    pub id: CartLineId,
    /// Product referenced by this line.
    pub product_id: ProductId,
    /// Product name at read time.
    pub product: String,
    /// Units of the product in the cart. Always positive.
    pub quantity: i32,
    /// Current catalog unit price.
    pub unit_price: Money,
}

/// Total for a single line: `quantity * unit_price`.
#[must_use]
pub fn line_total(line: &CartLine) -> Money {
    line.unit_price * line.quantity
}

/// Total for a whole cart, computed on read and never persisted.
#[must_use]
pub fn total(lines: &[CartLine]) -> Money {
    lines.iter().map(line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i32, quantity: i32, unit_cents: i64) -> CartLine {
        CartLine {
            id: CartLineId::new(id),
            product_id: ProductId::new(id),
            product: format!("product-{id}"),
            quantity,
            unit_price: Money::from_cents(unit_cents),
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(&line(1, 5, 1000)).to_string(), "50.00");
        assert_eq!(line_total(&line(2, 1, 350)).to_string(), "3.50");
    }

    #[test]
    fn test_cart_total_sums_lines() {
        // Widget(qty 5 @ 10.00) + Gadget(qty 1 @ 3.50) = 53.50
        let lines = vec![line(1, 5, 1000), line(2, 1, 350)];
        assert_eq!(total(&lines).to_string(), "53.50");
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        assert_eq!(total(&[]), Money::ZERO);
    }
}
