//! Seller store route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use kiosk_core::{Store, StoreId, StoreStatus};

use crate::db::StoreRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List active stores.
///
/// # Route
///
/// `GET /api/stores`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Store>>> {
    let stores = StoreRepository::new(state.store())
        .list_by_status(StoreStatus::Active)
        .await?;
    Ok(Json(stores))
}

/// Get one store by id, whatever its status.
///
/// # Route
///
/// `GET /api/stores/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> Result<Json<Store>> {
    let store = StoreRepository::new(state.store())
        .get(&id)
        .await?
        .ok_or(AppError::NotFound("Store"))?;

    Ok(Json(store))
}
