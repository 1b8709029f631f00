//! Catalog route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use pomelo_core::{Money, ProductId};

use crate::db::{ProductRepository, ProductSort, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::state::AppState;

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(detail).put(update).delete(delete))
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive name substring filter.
    pub search: Option<String>,
    /// Sort field: `price`, `-price`, `name`, `-name`. Defaults to `price`.
    pub sort: Option<String>,
}

/// Product creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Money,
}

/// Product update request body. Omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Money>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("product name cannot be blank".to_string()));
    }
    Ok(())
}

fn validate_price(price: Money) -> Result<()> {
    if price.is_negative() {
        return Err(AppError::Validation("price cannot be negative".to_string()));
    }
    Ok(())
}

/// List products, cheapest first unless told otherwise.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let sort = match query.sort.as_deref() {
        Some(s) => s
            .parse::<ProductSort>()
            .map_err(AppError::Validation)?,
        None => ProductSort::default(),
    };

    let products = ProductRepository::new(state.pool())
        .list(query.search.as_deref(), sort)
        .await?;

    Ok(Json(products))
}

/// Create a product.
async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    validate_name(&body.name)?;
    validate_price(body.price)?;

    let product = ProductRepository::new(state.pool())
        .create(body.name.trim(), body.price)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Fetch one product.
async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No product with id {id}")))?;

    Ok(Json(product))
}

/// Update a product's name and/or price.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if let Some(name) = &body.name {
        validate_name(name)?;
    }
    if let Some(price) = body.price {
        validate_price(price)?;
    }

    let product = ProductRepository::new(state.pool())
        .update(id, body.name.as_deref().map(str::trim), body.price)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("No product with id {id}")),
            other => AppError::Database(other),
        })?;

    Ok(Json(product))
}

/// Delete a product.
async fn delete(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("No product with id {id}")),
            other => AppError::Database(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
