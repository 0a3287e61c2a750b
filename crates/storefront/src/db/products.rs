//! Product repository.

use kiosk_core::{Product, ProductId, collections};

use super::{DocumentStore, RepositoryError, to_body};

/// Repository for product documents.
pub struct ProductRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Get every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let docs = self.store.list(collections::PRODUCTS).await?;
        Ok(docs
            .into_iter()
            .map(|doc| Product::new(ProductId::new(doc.id), doc.body))
            .collect())
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store query fails.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let doc = self.store.get(collections::PRODUCTS, id.as_str()).await?;
        Ok(doc.map(|doc| Product::new(ProductId::new(doc.id), doc.body)))
    }

    /// Create or overwrite a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the product cannot be serialized or written.
    pub async fn upsert(&self, product: &Product) -> Result<(), RepositoryError> {
        self.store
            .set(collections::PRODUCTS, product.id.as_str(), to_body(product)?)
            .await
    }
}
