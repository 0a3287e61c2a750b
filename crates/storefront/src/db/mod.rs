//! Document store access.
//!
//! # Storage model
//!
//! Every record is a schemaless JSON document addressed by
//! `(collection, id)`. The store is the sole source of truth: nothing here
//! caches, batches, retries, or validates beyond decoding into the
//! [`kiosk_core`] document shapes.
//!
//! ## Collections
//!
//! - `products` - Catalog, written by `kiosk seed products`
//! - `orders` - Customer orders (written by tooling outside this workspace)
//! - `stores` - Seller stores
//! - `users` - Profiles created on first sign-in
//!
//! # Backends
//!
//! - [`PgDocumentStore`] - `PostgreSQL` `JSONB` table (`documents`)
//! - [`MemoryDocumentStore`] - process-local, for development and tests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p kiosk-cli -- migrate
//! ```

mod memory;
mod postgres;

pub mod orders;
pub mod products;
pub mod stores;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// The fields of a stored document, without its id.
pub type DocumentBody = Map<String, Value>;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A value could not be serialized into a document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document does not have the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// A document read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Key the document is stored under.
    pub id: String,
    /// Stored fields.
    pub body: DocumentBody,
}

impl Document {
    /// Create a document from its key and fields.
    #[must_use]
    pub fn new(id: impl Into<String>, body: DocumentBody) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    /// The document's fields merged with its id.
    ///
    /// The key overrides any `id` field stored in the body.
    #[must_use]
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        body.insert("id".to_owned(), Value::String(self.id));
        Value::Object(body)
    }

    /// Decode the document (fields merged with id) into a typed model.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the document does not fit `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, RepositoryError> {
        let id = self.id.clone();
        serde_json::from_value(self.into_json())
            .map_err(|e| RepositoryError::DataCorruption(format!("document {id}: {e}")))
    }
}

/// Decode a listing, skipping documents that do not fit `T`.
///
/// Collections are schemaless, so one malformed document is logged and left
/// out rather than failing the whole listing.
pub fn decode_listing<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match doc.decode() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(collection, id = %id, error = %e, "Skipping malformed document");
                    None
                }
            }
        })
        .collect()
}

/// Serialize a model into a document body, dropping its `id` field.
///
/// # Errors
///
/// Returns `RepositoryError::Serialization` if `value` fails to serialize,
/// or `RepositoryError::DataCorruption` if it is not a JSON object.
pub fn to_body<T: Serialize>(value: &T) -> Result<DocumentBody, RepositoryError> {
    match serde_json::to_value(value)? {
        Value::Object(mut body) => {
            body.remove("id");
            Ok(body)
        }
        other => Err(RepositoryError::DataCorruption(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// A hosted document database.
///
/// Implementations are thin: one call per operation, upsert-by-id writes,
/// and no caching of their own.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, RepositoryError>;

    /// Fetch every document in a collection, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, RepositoryError>;

    /// Fetch documents whose top-level `field` equals `value`, ordered by id.
    async fn list_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, RepositoryError>;

    /// Create or overwrite the document stored under `id`.
    async fn set(&self, collection: &str, id: &str, body: DocumentBody)
    -> Result<(), RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> DocumentBody {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_into_json_merges_id_over_stored_field() {
        let doc = Document::new("p1", body(json!({"id": "stale", "name": "Lamp"})));
        assert_eq!(doc.into_json(), json!({"id": "p1", "name": "Lamp"}));
    }

    #[test]
    fn test_decode_reports_document_id() {
        let doc = Document::new("s9", body(json!({"name": "No owner"})));
        let err = doc.decode::<kiosk_core::Store>().unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(ref msg) if msg.contains("s9")));
    }

    #[test]
    fn test_decode_listing_skips_malformed_documents() {
        let docs = vec![
            Document::new("u1", body(json!({"createdAt": "2024-01-01T00:00:00Z"}))),
            Document::new("u2", body(json!({"createdAt": {"seconds": 1}}))),
            Document::new("u3", body(json!({"createdAt": "2024-02-01T00:00:00Z"}))),
        ];

        let profiles: Vec<kiosk_core::UserProfile> = decode_listing("users", docs);
        let ids: Vec<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["u1", "u3"]);
    }

    #[test]
    fn test_to_body_strips_id() {
        let body = to_body(&json!({"id": "x", "price": 3})).unwrap();
        assert!(!body.contains_key("id"));
        assert_eq!(body.get("price"), Some(&json!(3)));

        assert!(to_body(&json!([1, 2])).is_err());
    }
}
