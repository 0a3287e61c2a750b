//! User profile repository.

use kiosk_core::{UserId, UserProfile, collections};

use super::{Document, DocumentStore, RepositoryError, to_body};

/// Repository for user profile documents.
pub struct UserRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Get a user profile by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored profile is malformed.
    pub async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        self.store
            .get(collections::USERS, id.as_str())
            .await?
            .map(Document::decode)
            .transpose()
    }

    /// Write a user profile, overwriting any existing one with the same id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the profile cannot be serialized or written.
    pub async fn save(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        self.store
            .set(collections::USERS, profile.id.as_str(), to_body(profile)?)
            .await
    }
}
