//! Order repository.

use std::cmp::Reverse;

use serde_json::Value;

use kiosk_core::{Order, OrderId, UserId, collections};

use super::{Document, DocumentStore, RepositoryError, decode_listing};

/// Repository for order documents.
pub struct OrderRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Get a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails. Malformed
    /// orders are skipped.
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        let docs = self
            .store
            .list_where(
                collections::ORDERS,
                "userId",
                &Value::String(user_id.to_string()),
            )
            .await?;

        let mut orders: Vec<Order> = decode_listing(collections::ORDERS, docs);
        orders.sort_by_key(|order| Reverse(order.created_at));
        Ok(orders)
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored order is malformed.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        self.store
            .get(collections::ORDERS, id.as_str())
            .await?
            .map(Document::decode)
            .transpose()
    }
}
