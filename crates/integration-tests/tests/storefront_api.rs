//! Integration tests for the catalog, order and store routes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tower_sessions::MemoryStore;

use kiosk_core::{UserId, collections};
use kiosk_integration_tests::{
    TEST_ISSUER, TestContext, assert_status, build_app, identity_config, json_body, test_config,
};
use kiosk_storefront::db::{Document, DocumentBody, DocumentStore, RepositoryError};
use kiosk_storefront::middleware::request_id::REQUEST_ID_HEADER;
use kiosk_storefront::models::CurrentUser;

/// A store whose every call fails, standing in for an unreachable database.
struct FailingStore;

fn unavailable() -> RepositoryError {
    RepositoryError::DataCorruption("store unavailable".to_string())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, RepositoryError> {
        Err(unavailable())
    }

    async fn list(&self, _: &str) -> Result<Vec<Document>, RepositoryError> {
        Err(unavailable())
    }

    async fn list_where(&self, _: &str, _: &str, _: &Value) -> Result<Vec<Document>, RepositoryError> {
        Err(unavailable())
    }

    async fn set(&self, _: &str, _: &str, _: DocumentBody) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(unavailable())
    }
}

fn failing_context() -> TestContext {
    let mut ctx = TestContext::new();
    ctx.app = build_app(
        Arc::new(FailingStore),
        MemoryStore::default(),
        test_config(identity_config(TEST_ISSUER)),
    );
    ctx
}

fn order(id: &str, user: &str, created_at: &str) -> Value {
    json!({
        "orderId": format!("ORD-{id}"),
        "status": "processing",
        "total": 25.0,
        "createdAt": created_at,
        "userId": user,
        "items": [{
            "id": "canvas-tote",
            "name": "Canvas Tote",
            "price": 12.5,
            "quantity": 2,
            "totalPrice": 25.0
        }]
    })
}

fn store_doc(name: &str, status: &str) -> Value {
    json!({
        "name": name,
        "description": "Test store",
        "ownerId": "seller-1",
        "status": status,
        "address": "1 Market St",
        "city": "Springfield",
        "phone": "555-0100",
        "contactInfo": {"email": "shop@kiosk.test", "phone": "555-0100", "address": "1 Market St"},
        "settings": {"shippingEnabled": true},
        "totalProducts": 3,
        "totalSales": 99.5,
        "rating": 4.2,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-02-01T00:00:00Z"
    })
}

fn shopper(id: &str) -> CurrentUser {
    CurrentUser {
        id: UserId::new(id),
        email: None,
        name: Some("Shopper".to_string()),
    }
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new();

    let response = assert_status(ctx.get("/health").await, StatusCode::OK).await;
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");

    assert_status(ctx.get("/health/ready").await, StatusCode::OK).await;
    assert_status(
        failing_context().get("/health/ready").await,
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            axum::http::Request::get("/health")
                .header(REQUEST_ID_HEADER, "req-123")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-123");

    let generated = ctx.get("/health").await;
    assert!(generated.headers().contains_key(REQUEST_ID_HEADER));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_list_products_returns_every_document() {
    let ctx = TestContext::new();
    ctx.put(collections::PRODUCTS, "mug", json!({"name": "Mug", "price": 14}))
        .await;
    ctx.put(collections::PRODUCTS, "tee", json!({"name": "Tee", "price": 20.5}))
        .await;
    ctx.put(collections::PRODUCTS, "bare", json!({})).await;

    let response = assert_status(ctx.get("/api/products").await, StatusCode::OK).await;
    let body = json_body(response).await;
    let products = body.as_array().unwrap();

    assert_eq!(products.len(), ctx.store.count(collections::PRODUCTS).await);
    let ids: Vec<&str> = products
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["bare", "mug", "tee"]);
    assert_eq!(products[1]["name"], "Mug");
}

#[tokio::test]
async fn test_list_products_empty_catalog() {
    let ctx = TestContext::new();

    let response = assert_status(ctx.get("/api/products").await, StatusCode::OK).await;
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_get_product_merges_id_into_fields() {
    let ctx = TestContext::new();
    ctx.put(
        collections::PRODUCTS,
        "mug",
        json!({"id": "stale", "name": "Mug", "price": 14, "tags": ["kitchen"]}),
    )
    .await;

    let response = assert_status(ctx.get("/api/products/mug").await, StatusCode::OK).await;
    let product = json_body(response).await;

    assert_eq!(
        product,
        json!({"id": "mug", "name": "Mug", "price": 14, "tags": ["kitchen"]})
    );
}

#[tokio::test]
async fn test_get_missing_product_is_404() {
    let ctx = TestContext::new();

    let response = assert_status(ctx.get("/api/products/nope").await, StatusCode::NOT_FOUND).await;
    assert_eq!(json_body(response).await, json!({"error": "Product not found"}));
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let ctx = failing_context();

    for uri in ["/api/products", "/api/products/mug", "/api/stores"] {
        let response = assert_status(ctx.get(uri).await, StatusCode::INTERNAL_SERVER_ERROR).await;
        assert_eq!(
            json_body(response).await,
            json!({"error": "Internal server error"}),
            "{uri}"
        );
    }
}

// ============================================================================
// Stores
// ============================================================================

#[tokio::test]
async fn test_list_stores_only_active() {
    let ctx = TestContext::new();
    ctx.put(collections::STORES, "open", store_doc("Open Shop", "active"))
        .await;
    ctx.put(collections::STORES, "closed", store_doc("Closed Shop", "inactive"))
        .await;
    ctx.put(collections::STORES, "banned", store_doc("Banned Shop", "suspended"))
        .await;

    let response = assert_status(ctx.get("/api/stores").await, StatusCode::OK).await;
    let body = json_body(response).await;
    let stores = body.as_array().unwrap();

    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0]["id"], "open");
    assert_eq!(stores[0]["contactInfo"]["email"], "shop@kiosk.test");
}

#[tokio::test]
async fn test_get_store_by_id_regardless_of_status() {
    let ctx = TestContext::new();
    ctx.put(collections::STORES, "closed", store_doc("Closed Shop", "inactive"))
        .await;

    let response = assert_status(ctx.get("/api/stores/closed").await, StatusCode::OK).await;
    assert_eq!(json_body(response).await["status"], "inactive");

    let response = assert_status(ctx.get("/api/stores/nope").await, StatusCode::NOT_FOUND).await;
    assert_eq!(json_body(response).await, json!({"error": "Store not found"}));
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_orders_require_sign_in() {
    let ctx = TestContext::new();

    for uri in ["/api/orders", "/api/orders/o1"] {
        let response = assert_status(ctx.get(uri).await, StatusCode::UNAUTHORIZED).await;
        assert_eq!(json_body(response).await, json!({"error": "Sign-in required"}));
    }
}

#[tokio::test]
async fn test_list_orders_for_signed_in_user_newest_first() {
    let ctx = TestContext::new();
    ctx.put(collections::ORDERS, "o1", order("o1", "alice", "2024-01-01T10:00:00Z"))
        .await;
    ctx.put(collections::ORDERS, "o2", order("o2", "alice", "2024-03-01T10:00:00Z"))
        .await;
    ctx.put(collections::ORDERS, "o3", order("o3", "bob", "2024-02-01T10:00:00Z"))
        .await;

    let cookie = ctx.sign_in_as(&shopper("alice")).await;
    let response = assert_status(
        ctx.get_with_cookie("/api/orders", &cookie).await,
        StatusCode::OK,
    )
    .await;
    let body = json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();

    assert_eq!(ids, ["o2", "o1"]);
}

#[tokio::test]
async fn test_get_order_hides_other_users_orders() {
    let ctx = TestContext::new();
    ctx.put(collections::ORDERS, "o1", order("o1", "alice", "2024-01-01T10:00:00Z"))
        .await;

    let alice = ctx.sign_in_as(&shopper("alice")).await;
    let response = assert_status(
        ctx.get_with_cookie("/api/orders/o1", &alice).await,
        StatusCode::OK,
    )
    .await;
    let body = json_body(response).await;
    assert_eq!(body["orderId"], "ORD-o1");
    assert_eq!(body["items"][0]["quantity"], 2);

    let bob = ctx.sign_in_as(&shopper("bob")).await;
    let response = assert_status(
        ctx.get_with_cookie("/api/orders/o1", &bob).await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(json_body(response).await, json!({"error": "Order not found"}));
}

// ============================================================================
// Malformed documents
// ============================================================================

#[tokio::test]
async fn test_listings_skip_malformed_documents() {
    let ctx = TestContext::new();

    let mut partial_store = store_doc("Partial Shop", "active");
    partial_store.as_object_mut().unwrap().remove("rating");
    ctx.put(collections::STORES, "good", store_doc("Good Shop", "active"))
        .await;
    ctx.put(collections::STORES, "partial", partial_store).await;

    let response = assert_status(ctx.get("/api/stores").await, StatusCode::OK).await;
    let body = json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["good"]);

    let mut odd_order = order("o2", "alice", "2024-03-01T10:00:00Z");
    odd_order["createdAt"] = json!({"seconds": 1_709_287_200});
    ctx.put(collections::ORDERS, "o1", order("o1", "alice", "2024-01-01T10:00:00Z"))
        .await;
    ctx.put(collections::ORDERS, "o2", odd_order).await;

    let cookie = ctx.sign_in_as(&shopper("alice")).await;
    let response = assert_status(
        ctx.get_with_cookie("/api/orders", &cookie).await,
        StatusCode::OK,
    )
    .await;
    let body = json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["o1"]);
}
