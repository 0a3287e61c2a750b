//! Integration tests for Kiosk.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (memory document store, memory sessions)
//! cargo test -p kiosk-integration-tests
//!
//! # Include the PostgreSQL-backed tests
//! KIOSK_TEST_DATABASE_URL=postgres://localhost/kiosk_test \
//!     cargo test -p kiosk-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - catalog, order and store routes
//! - `auth_flow` - sign-in, callback, sign-out and route protection
//! - `catalog_upload` - seeding the product catalog
//! - `postgres_store` - the `PostgreSQL` document store (ignored by default)

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::{
    MemoryStore, SessionStore,
    cookie::time::{Duration, OffsetDateTime},
    session::{Id, Record},
};
use url::Url;

use kiosk_storefront::config::{
    DEFAULT_PROTECTED_PATHS, DocumentStoreConfig, IdentityConfig, StorefrontConfig,
};
use kiosk_storefront::db::{DocumentBody, DocumentStore, MemoryDocumentStore};
use kiosk_storefront::middleware::create_session_layer;
use kiosk_storefront::middleware::session::SESSION_COOKIE_NAME;
use kiosk_storefront::models::{CurrentUser, session_keys};
use kiosk_storefront::routes;
use kiosk_storefront::state::AppState;

/// Issuer used when a test never talks to the identity provider.
pub const TEST_ISSUER: &str = "https://login.kiosk.test";

/// Base URL the test storefront believes it is served from.
pub const TEST_BASE_URL: &str = "http://localhost:3000";

/// Identity provider endpoints rooted at `issuer`.
#[must_use]
pub fn identity_config(issuer: &str) -> IdentityConfig {
    let endpoint = |path: &str| Url::parse(&format!("{issuer}/{path}")).unwrap();
    IdentityConfig {
        client_id: "kiosk-test-client".to_string(),
        client_secret: SecretString::from("kiosk-test-client-secret"),
        scopes: "openid email profile".to_string(),
        authorize_url: endpoint("authorize"),
        token_url: endpoint("oauth/token"),
        userinfo_url: endpoint("userinfo"),
        logout_url: endpoint("v2/logout"),
    }
}

/// Storefront configuration for in-process tests.
#[must_use]
pub fn test_config(identity: IdentityConfig) -> StorefrontConfig {
    StorefrontConfig {
        document_store: DocumentStoreConfig::Memory,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: TEST_BASE_URL.to_string(),
        session_secret: SecretString::from("t3st-S3ssion-s3cret-with-3nough-entropy!"),
        protected_paths: DEFAULT_PROTECTED_PATHS
            .iter()
            .map(ToString::to_string)
            .collect(),
        identity,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A storefront router over in-memory documents and sessions.
pub struct TestContext {
    /// Backing document store, for seeding and inspection.
    pub store: Arc<MemoryDocumentStore>,
    /// Backing session store, for planting signed-in sessions.
    pub sessions: MemoryStore,
    /// The application under test.
    pub app: Router,
}

impl TestContext {
    /// Context whose identity provider is never contacted.
    #[must_use]
    pub fn new() -> Self {
        Self::with_identity(identity_config(TEST_ISSUER))
    }

    /// Context pointed at a specific identity provider.
    #[must_use]
    pub fn with_identity(identity: IdentityConfig) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let sessions = MemoryStore::default();
        let app = build_app(store.clone(), sessions.clone(), test_config(identity));
        Self {
            store,
            sessions,
            app,
        }
    }

    /// Write a document straight into the store.
    pub async fn put(&self, collection: &str, id: &str, value: Value) {
        self.store.set(collection, id, body(value)).await.unwrap();
    }

    /// Send a GET request.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Send a GET request carrying a session cookie.
    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> Response<Body> {
        self.send(
            Request::get(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Send an arbitrary request.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Create a session in which `user` is signed in and return its cookie.
    pub async fn sign_in_as(&self, user: &CurrentUser) -> String {
        let mut record = Record {
            id: Id::default(),
            data: [(
                session_keys::CURRENT_USER.to_string(),
                serde_json::to_value(user).unwrap(),
            )]
            .into_iter()
            .collect(),
            expiry_date: OffsetDateTime::now_utc() + Duration::days(1),
        };
        self.sessions.create(&mut record).await.unwrap();
        format!("{SESSION_COOKIE_NAME}={}", record.id)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the router over any document store, with memory-backed sessions.
#[must_use]
pub fn build_app(
    store: Arc<dyn DocumentStore>,
    sessions: MemoryStore,
    config: StorefrontConfig,
) -> Router {
    let session_layer = create_session_layer(sessions, &config);
    routes::app(AppState::new(config, store), session_layer)
}

/// Read a response body as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response<Body>) -> &str {
    assert!(
        response.status().is_redirection(),
        "expected a redirect, got {}",
        response.status()
    );
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
}

/// The `name=value` pair of the session cookie set by a response, if any.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_string)
}

/// Document body from a JSON object literal.
#[must_use]
pub fn body(value: Value) -> DocumentBody {
    match value {
        Value::Object(map) => map,
        _ => panic!("document body must be a JSON object"),
    }
}

/// Assert a response status, showing the body on mismatch.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> Response<Body> {
    if response.status() == expected {
        return response;
    }
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    panic!(
        "expected {expected}, got {status}: {}",
        String::from_utf8_lossy(&bytes)
    );
}
