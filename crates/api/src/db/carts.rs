//! Cart repository for database operations.
//!
//! The add path is a single upsert: the first add of a product inserts the
//! line with the requested quantity, every later add increments it. Postgres
//! serializes concurrent increments on the conflicting row, so no update is
//! lost. The cart row is locked `FOR SHARE` while a line is written, which
//! orders every add entirely before or entirely after an order drain (the
//! drain takes the same row `FOR UPDATE`).

use sqlx::PgPool;

use pomelo_core::{CartId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            SELECT id, user_id, created_at
            FROM shop.carts
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Get a user's cart, creating one if the user somehow has none.
    ///
    /// Carts are provisioned at registration; this only inserts when that
    /// row is missing. Uniqueness is carried by the `user_id` constraint;
    /// `ON CONFLICT DO NOTHING` makes concurrent calls converge on the
    /// one existing row without retry logic.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shop.carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        self.get_by_user(user_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// All lines in a cart, joined with product name and current unit price.
    ///
    /// An empty cart yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT cl.id, cl.product_id, p.name AS product, cl.quantity, p.price AS unit_price
            FROM shop.cart_lines cl
            JOIN shop.products p ON p.id = cl.product_id
            WHERE cl.cart_id = $1
            ORDER BY cl.id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add a product to a user's cart, or bump the existing line.
    ///
    /// Returns the line's resulting quantity. The first add sets the
    /// quantity to `quantity`; repeat adds are additive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no cart.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<i32, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<(i32,)> = sqlx::query_as(
            r"
            SELECT id
            FROM shop.carts
            WHERE user_id = $1
            FOR SHARE
            ",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((cart_id,)) = cart_id else {
            return Err(RepositoryError::NotFound);
        };

        let (new_quantity,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO shop.cart_lines (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = shop.cart_lines.quantity + EXCLUDED.quantity
            RETURNING quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(new_quantity)
    }

    /// Remove a product's line from a user's cart.
    ///
    /// Removing a line that isn't there is an error, not a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no cart or the
    /// cart has no line for this product.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let cart = self
            .get_by_user(user_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let result = sqlx::query(
            r"
            DELETE FROM shop.cart_lines
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart.id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
