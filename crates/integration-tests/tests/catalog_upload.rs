//! Integration tests for seeding the product catalog.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use kiosk_core::collections;
use kiosk_integration_tests::{TestContext, assert_status, json_body};
use kiosk_storefront::services::catalog::{builtin_catalog, upload_products};

#[tokio::test]
async fn test_seeded_catalog_is_served() {
    let ctx = TestContext::new();
    let products = builtin_catalog().unwrap();

    let report = upload_products(ctx.store.as_ref(), &products).await;
    assert!(report.is_complete());
    assert_eq!(report.written, products.len());

    let response = assert_status(ctx.get("/api/products").await, StatusCode::OK).await;
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), products.len());

    let first = &products[0];
    let response = assert_status(
        ctx.get(&format!("/api/products/{}", first.id)).await,
        StatusCode::OK,
    )
    .await;
    let served = json_body(response).await;
    assert_eq!(served["id"], first.id.as_str());
    assert_eq!(served["name"], first.name().unwrap());
}

#[tokio::test]
async fn test_uploading_twice_does_not_duplicate() {
    let ctx = TestContext::new();
    let products = builtin_catalog().unwrap();

    upload_products(ctx.store.as_ref(), &products).await;
    upload_products(ctx.store.as_ref(), &products).await;

    assert_eq!(ctx.store.count(collections::PRODUCTS).await, products.len());
}
