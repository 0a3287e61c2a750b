//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (document store ping)
//!
//! # Catalog
//! GET  /api/products           - All products
//! GET  /api/products/{id}      - One product
//! GET  /api/stores             - Active seller stores
//! GET  /api/stores/{id}        - One store
//!
//! # Orders (requires auth)
//! GET  /api/orders             - Signed-in user's orders, newest first
//! GET  /api/orders/{id}        - One of the signed-in user's orders
//!
//! # Auth
//! GET  /auth/sign-in           - Redirect to the identity provider
//! GET  /auth/callback          - Handle the provider's callback
//! GET  /auth/sign-out          - Sign out (also POST)
//! GET  /api/me                 - Signed-in user (requires auth)
//! ```

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod stores;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::{protect_routes_middleware, request_id_middleware};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::index))
        .route("/{id}", get(stores::show))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in))
        .route("/callback", get(auth::callback))
        .route("/sign-out", get(auth::sign_out).post(auth::sign_out))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/products", product_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/stores", store_routes())
        .route("/api/me", get(auth::me))
        .nest("/auth", auth_routes())
}

/// Build the application with its middleware stack.
///
/// Sentry layers are left to the caller so tests can drive the router
/// without a Sentry client.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes()
        .layer(from_fn_with_state(state.clone(), protect_routes_middleware))
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
