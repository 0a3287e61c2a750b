//! In-memory document store.
//!
//! Used for local development (`KIOSK_DOCUMENT_STORE=memory`) and tests.
//! Collections are `BTreeMap`s so listings come back ordered by id, the same
//! as the `PostgreSQL` backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Document, DocumentBody, DocumentStore, RepositoryError};

type Collection = BTreeMap<String, DocumentBody>;

/// Process-local document store.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

fn to_documents<'a>(entries: impl Iterator<Item = (&'a String, &'a DocumentBody)>) -> Vec<Document> {
    entries
        .map(|(id, body)| Document::new(id.clone(), body.clone()))
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|body| Document::new(id, body.clone())))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| to_documents(docs.iter()))
            .unwrap_or_default())
    }

    async fn list_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, RepositoryError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                to_documents(
                    docs.iter()
                        .filter(|(_, body)| body.get(field) == Some(value)),
                )
            })
            .unwrap_or_default())
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        body: DocumentBody,
    ) -> Result<(), RepositoryError> {
        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), body);
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::to_body;

    #[tokio::test]
    async fn test_set_overwrites_by_id() {
        let store = MemoryDocumentStore::new();
        store
            .set("products", "p1", to_body(&json!({"name": "Old"})).unwrap())
            .await
            .unwrap();
        store
            .set("products", "p1", to_body(&json!({"name": "New"})).unwrap())
            .await
            .unwrap();

        assert_eq!(store.count("products").await, 1);
        let doc = store.get("products", "p1").await.unwrap().unwrap();
        assert_eq!(doc.body.get("name"), Some(&json!("New")));
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_scoped_to_collection() {
        let store = MemoryDocumentStore::new();
        for id in ["b", "a", "c"] {
            store
                .set("products", id, to_body(&json!({})).unwrap())
                .await
                .unwrap();
        }
        store
            .set("stores", "z", to_body(&json!({})).unwrap())
            .await
            .unwrap();

        let ids: Vec<_> = store
            .list("products")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(store.list("orders").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_where_matches_json_value() {
        let store = MemoryDocumentStore::new();
        store
            .set("orders", "o1", to_body(&json!({"userId": "u1"})).unwrap())
            .await
            .unwrap();
        store
            .set("orders", "o2", to_body(&json!({"userId": "u2"})).unwrap())
            .await
            .unwrap();

        let docs = store
            .list_where("orders", "userId", &json!("u1"))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "o1");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemoryDocumentStore::new();
        assert!(store.get("products", "nope").await.unwrap().is_none());
    }
}
