//! Order repository: the cart-to-order transfer and order reads.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use pomelo_core::{Money, OrderId, PaymentMethod, UserId};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderLine};

/// Errors from the order transfer.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The user has no cart row at all. Carts are provisioned at
    /// registration, so this should not occur in practice.
    #[error("the user does not have an active cart")]
    NoActiveCart,

    /// The cart exists but holds no lines; an order is never created empty.
    #[error("no products in the cart")]
    EmptyCart,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

const ORDER_COLUMNS: &str = r"id, user_id, country, city, state, street, phone, zip_code,
           order_status, payment_status, payment_method, total_price, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    country: String,
    city: String,
    state: String,
    street: String,
    phone: String,
    zip_code: String,
    order_status: String,
    payment_status: String,
    payment_method: String,
    total_price: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let order_status = self.order_status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_status = self.payment_status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;
        let payment_method = self.payment_method.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            country: self.country,
            city: self.city,
            state: self.state,
            street: self.street,
            phone: self.phone,
            zip_code: self.zip_code,
            order_status,
            payment_status,
            payment_method,
            total_price: self.total_price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Drain a user's cart into a new order.
    ///
    /// Runs as one transaction: create the order row, snapshot every cart
    /// line into an order line while accumulating the total, freeze the
    /// total onto the order, and clear the cart lines (the cart row itself
    /// survives, empty). Any failure rolls the whole sequence back, leaving
    /// cart and order state untouched.
    ///
    /// The cart row is taken `FOR UPDATE` first, so a concurrent add to the
    /// same cart lands entirely before or entirely after the drain.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NoActiveCart` if the user has no cart and
    /// `OrderError::EmptyCart` if it holds no lines; `OrderError::Repository`
    /// wraps database failures.
    pub async fn create_from_cart(
        &self,
        user_id: UserId,
        details: &NewOrder,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<(i32,)> = sqlx::query_as(
            r"
            SELECT id
            FROM shop.carts
            WHERE user_id = $1
            FOR UPDATE
            ",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((cart_id,)) = cart_id else {
            return Err(OrderError::NoActiveCart);
        };

        #[derive(sqlx::FromRow)]
        struct DrainLine {
            product_id: i32,
            quantity: i32,
            unit_price: Money,
        }

        let lines = sqlx::query_as::<_, DrainLine>(
            r"
            SELECT cl.product_id, cl.quantity, p.price AS unit_price
            FROM shop.cart_lines cl
            JOIN shop.products p ON p.id = cl.product_id
            WHERE cl.cart_id = $1
            ORDER BY cl.id
            ",
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let payment_method = details.payment_method.unwrap_or(PaymentMethod::Cash);

        let (order_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO shop.orders
                (user_id, country, city, state, street, phone, zip_code, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(&details.country)
        .bind(&details.city)
        .bind(&details.state)
        .bind(&details.street)
        .bind(&details.phone)
        .bind(&details.zip_code)
        .bind(payment_method.to_string())
        .fetch_one(&mut *tx)
        .await?;

        let mut total = Money::ZERO;
        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO shop.order_lines (order_id, product_id, quantity)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            total += line.unit_price * line.quantity;
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            UPDATE shop.orders
            SET total_price = $2,
                updated_at = now()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            ",
        ))
        .bind(order_id)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            DELETE FROM shop.cart_lines
            WHERE cart_id = $1
            ",
        )
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_order()?)
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM shop.orders
            WHERE id = $1
            ",
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM shop.orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Read-only projection of an order's lines, joined with product names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, order_id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r"
            SELECT ol.id, ol.order_id, ol.product_id, p.name AS product, ol.quantity,
                   ol.created_at, ol.updated_at
            FROM shop.order_lines ol
            JOIN shop.products p ON p.id = ol.product_id
            WHERE ol.order_id = $1
            ORDER BY ol.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }
}
