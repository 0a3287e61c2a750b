//! Product catalog upload.
//!
//! The catalog is a static YAML list shipped with the storefront
//! (`seed/products.yaml`). Uploading walks the list in order and writes each
//! product under its own id, so re-running an upload overwrites rather than
//! duplicates. There is no retry: a failed write is logged and counted, and
//! the upload moves on to the next product.

use kiosk_core::{Product, ProductId};

use crate::db::{DocumentStore, ProductRepository};

/// The catalog bundled with the storefront.
pub const BUILTIN_CATALOG: &str = include_str!("../../seed/products.yaml");

/// Errors loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog is not a YAML list of products with ids.
    #[error("invalid catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Outcome of a catalog upload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Products written successfully.
    pub written: usize,
    /// Products that failed to write, with the error message.
    pub failed: Vec<(ProductId, String)>,
}

impl UploadReport {
    /// Whether every product was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Parse a YAML catalog: a list of mappings, each with an `id`.
///
/// # Errors
///
/// Returns `CatalogError::Yaml` if the document is malformed.
pub fn parse_catalog(yaml: &str) -> Result<Vec<Product>, CatalogError> {
    let products: Vec<Product> = serde_yaml::from_str(yaml)?;
    Ok(products)
}

/// Parse the bundled catalog.
///
/// # Errors
///
/// Returns `CatalogError::Yaml` if the bundled file is malformed.
pub fn builtin_catalog() -> Result<Vec<Product>, CatalogError> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Write every product to the store, in order.
pub async fn upload_products(store: &dyn DocumentStore, products: &[Product]) -> UploadReport {
    let repo = ProductRepository::new(store);
    let total = products.len();
    let mut report = UploadReport::default();

    for (index, product) in products.iter().enumerate() {
        match repo.upsert(product).await {
            Ok(()) => {
                report.written += 1;
                tracing::info!(
                    product_id = %product.id,
                    name = product.name().unwrap_or_default(),
                    "Uploaded product {}/{}",
                    index + 1,
                    total
                );
            }
            Err(e) => {
                tracing::error!(product_id = %product.id, error = %e, "Failed to upload product");
                report.failed.push((product.id.clone(), e.to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::db::{Document, DocumentBody, MemoryDocumentStore, RepositoryError};

    /// Memory store that refuses writes to one document id.
    struct RejectingStore {
        inner: MemoryDocumentStore,
        reject_id: &'static str,
    }

    #[async_trait]
    impl DocumentStore for RejectingStore {
        async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, RepositoryError> {
            self.inner.get(collection, id).await
        }

        async fn list(&self, collection: &str) -> Result<Vec<Document>, RepositoryError> {
            self.inner.list(collection).await
        }

        async fn list_where(
            &self,
            collection: &str,
            field: &str,
            value: &Value,
        ) -> Result<Vec<Document>, RepositoryError> {
            self.inner.list_where(collection, field, value).await
        }

        async fn set(
            &self,
            collection: &str,
            id: &str,
            body: DocumentBody,
        ) -> Result<(), RepositoryError> {
            if id == self.reject_id {
                return Err(RepositoryError::DataCorruption(format!("write to {id} refused")));
            }
            self.inner.set(collection, id, body).await
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            self.inner.ping().await
        }
    }

    #[test]
    fn test_builtin_catalog_parses_with_unique_ids() {
        let products = builtin_catalog().unwrap();
        assert!(!products.is_empty());

        let mut ids: Vec<_> = products.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), products.len());
        assert!(products.iter().all(|p| p.name().is_some() && p.price().is_some()));
    }

    #[test]
    fn test_parse_catalog_requires_ids() {
        assert!(parse_catalog("- name: Nameless\n  price: 1\n").is_err());
    }

    #[tokio::test]
    async fn test_upload_overwrites_existing_ids() {
        let store = MemoryDocumentStore::new();
        let products = parse_catalog(
            "- id: a\n  name: First\n  price: 1\n- id: b\n  name: Second\n  price: 2\n",
        )
        .unwrap();

        let first = upload_products(&store, &products).await;
        let second = upload_products(&store, &products).await;

        assert_eq!(first.written, 2);
        assert!(second.is_complete());
        assert_eq!(store.count("products").await, 2);
    }

    #[tokio::test]
    async fn test_upload_continues_past_failed_product() {
        let store = RejectingStore {
            inner: MemoryDocumentStore::new(),
            reject_id: "b",
        };
        let products = parse_catalog(
            "- id: a\n  name: First\n- id: b\n  name: Second\n- id: c\n  name: Third\n",
        )
        .unwrap();

        let report = upload_products(&store, &products).await;

        assert_eq!(report.written, 2);
        assert!(!report.is_complete());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, ProductId::new("b"));
        assert!(report.failed[0].1.contains("refused"));

        assert!(store.get("products", "a").await.unwrap().is_some());
        assert!(store.get("products", "b").await.unwrap().is_none());
        assert!(store.get("products", "c").await.unwrap().is_some());
    }
}
