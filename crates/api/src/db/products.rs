//! Product repository for catalog operations.

use sqlx::PgPool;

use pomelo_core::{Money, ProductId};

use super::{RepositoryError, map_unique_violation};
use crate::models::product::Product;

/// Sort orders accepted by the catalog listing.
///
/// The wire format follows the usual `field` / `-field` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Cheapest first (the default).
    #[default]
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl ProductSort {
    /// The `ORDER BY` clause for this sort. Whitelisted here so no caller
    /// input ever reaches the SQL string.
    const fn order_by(self) -> &'static str {
        match self {
            Self::PriceAsc => "price ASC, id ASC",
            Self::PriceDesc => "price DESC, id ASC",
            Self::NameAsc => "name ASC, id ASC",
            Self::NameDesc => "name DESC, id ASC",
        }
    }
}

impl std::str::FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(Self::PriceAsc),
            "-price" => Ok(Self::PriceDesc),
            "name" => Ok(Self::NameAsc),
            "-name" => Ok(Self::NameDesc),
            _ => Err(format!("invalid sort field: {s}")),
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by a name substring.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        sort: ProductSort,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = if let Some(needle) = search {
            sqlx::query_as::<_, Product>(&format!(
                r"
                SELECT id, name, price, created_at, updated_at
                FROM shop.products
                WHERE name ILIKE '%' || $1 || '%'
                ORDER BY {}
                ",
                sort.order_by()
            ))
            .bind(needle)
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Product>(&format!(
                r"
                SELECT id, name, price, created_at, updated_at
                FROM shop.products
                ORDER BY {}
                ",
                sort.order_by()
            ))
            .fetch_all(self.pool)
            .await?
        };

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, created_at, updated_at
            FROM shop.products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by its (unique) name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, created_at, updated_at
            FROM shop.products
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, name: &str, price: Money) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO shop.products (name, price)
            VALUES ($1, $2)
            RETURNING id, name, price, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "product name already exists"))?;

        Ok(product)
    }

    /// Update a product's name and/or price.
    ///
    /// Omitted fields keep their current value. Price edits never touch
    /// existing orders; their totals are frozen at creation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        name: Option<&str>,
        price: Option<Money>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE shop.products
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, price, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "product name already exists"))?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// Products referenced by order lines cannot be deleted; order snapshots
    /// are immutable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if existing orders reference it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shop.products
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Conflict(
                    "product is referenced by existing orders".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parsing() {
        assert_eq!("price".parse::<ProductSort>(), Ok(ProductSort::PriceAsc));
        assert_eq!("-price".parse::<ProductSort>(), Ok(ProductSort::PriceDesc));
        assert_eq!("name".parse::<ProductSort>(), Ok(ProductSort::NameAsc));
        assert_eq!("-name".parse::<ProductSort>(), Ok(ProductSort::NameDesc));
        assert!("created_at".parse::<ProductSort>().is_err());
        assert!("price; DROP TABLE shop.products".parse::<ProductSort>().is_err());
    }

    #[test]
    fn test_default_sort_is_price_ascending() {
        assert_eq!(ProductSort::default(), ProductSort::PriceAsc);
        assert!(ProductSort::default().order_by().starts_with("price ASC"));
    }
}
