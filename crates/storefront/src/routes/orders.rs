//! Order route handlers (signed-in users only).

use axum::{
    Json,
    extract::{Path, State},
};

use kiosk_core::{Order, OrderId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// List the signed-in user's orders, newest first.
///
/// # Route
///
/// `GET /api/orders`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.store())
        .list_for_user(&user.id)
        .await?;
    Ok(Json(orders))
}

/// Get one of the signed-in user's orders.
///
/// Orders belonging to someone else are reported as missing.
///
/// # Route
///
/// `GET /api/orders/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.store())
        .get(&id)
        .await?
        .filter(|order| order.user_id == user.id)
        .ok_or(AppError::NotFound("Order"))?;

    Ok(Json(order))
}
