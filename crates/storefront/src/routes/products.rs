//! Product route handlers.
//!
//! Both handlers are a single document store read; products are returned
//! exactly as stored, with the document id merged in.

use axum::{
    Json,
    extract::{Path, State},
};

use kiosk_core::{Product, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List every product.
///
/// # Route
///
/// `GET /api/products`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.store()).list().await?;
    Ok(Json(products))
}

/// Get one product by id.
///
/// # Route
///
/// `GET /api/products/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.store())
        .get(&id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    Ok(Json(product))
}
