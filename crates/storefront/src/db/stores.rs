//! Store repository.

use serde_json::Value;

use kiosk_core::{Store, StoreId, StoreStatus, collections};

use super::{Document, DocumentStore, RepositoryError, decode_listing};

/// Repository for seller store documents.
pub struct StoreRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Get every store with the given status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails. Malformed
    /// stores are skipped.
    pub async fn list_by_status(&self, status: StoreStatus) -> Result<Vec<Store>, RepositoryError> {
        let docs = self
            .store
            .list_where(
                collections::STORES,
                "status",
                &Value::String(status.as_str().to_owned()),
            )
            .await?;
        Ok(decode_listing(collections::STORES, docs))
    }

    /// Get a store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored store is malformed.
    pub async fn get(&self, id: &StoreId) -> Result<Option<Store>, RepositoryError> {
        self.store
            .get(collections::STORES, id.as_str())
            .await?
            .map(Document::decode)
            .transpose()
    }
}
