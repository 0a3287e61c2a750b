//! User initializer.
//!
//! Runs on every successful sign-in and makes sure the signed-in user has a
//! profile document. The profile is written once and never updated here.

use chrono::Utc;

use kiosk_core::{Email, UserId, UserProfile};

use crate::db::{DocumentStore, RepositoryError, UserRepository};
use crate::identity::IdentityUser;

/// Whether `ensure_user_exists` had to create the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInit {
    /// A profile already existed.
    Existing,
    /// A new profile was written.
    Created,
}

/// Make sure a profile document exists for the signed-in user.
///
/// # Errors
///
/// Returns `RepositoryError` if the profile cannot be read or written.
pub async fn ensure_user_exists(
    store: &dyn DocumentStore,
    user: &IdentityUser,
) -> Result<UserInit, RepositoryError> {
    let repo = UserRepository::new(store);
    let id = UserId::new(user.sub.clone());

    if repo.get(&id).await?.is_some() {
        return Ok(UserInit::Existing);
    }

    let email = user.email.as_deref().and_then(|raw| match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(e) => {
            tracing::warn!(user_id = %id, error = %e, "Ignoring invalid email from identity provider");
            None
        }
    });

    let profile = UserProfile {
        id,
        email,
        display_name: user.name.clone(),
        created_at: Utc::now(),
    };
    repo.save(&profile).await?;

    tracing::info!(user_id = %profile.id, "Created user profile");
    Ok(UserInit::Created)
}

/// Run the user initializer, logging failures instead of surfacing them.
///
/// Sign-in succeeds even if the profile could not be written.
pub async fn initialize_user(store: &dyn DocumentStore, user: &IdentityUser) {
    if let Err(e) = ensure_user_exists(store, user).await {
        tracing::error!(user_id = %user.sub, error = %e, "Failed to initialize user");
    }
}
