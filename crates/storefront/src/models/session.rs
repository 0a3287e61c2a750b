//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use kiosk_core::{Email, UserId};

use crate::identity::IdentityUser;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Identity-provider subject, also the user document id.
    pub id: UserId,
    /// User's email address, when the provider shared one.
    pub email: Option<Email>,
    /// Display name, when the provider shared one.
    pub name: Option<String>,
}

impl From<&IdentityUser> for CurrentUser {
    fn from(user: &IdentityUser) -> Self {
        Self {
            id: UserId::new(user.sub.clone()),
            email: user.email.as_deref().and_then(|e| Email::parse(e).ok()),
            name: user.name.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for OAuth state (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Key for OAuth nonce (`OpenID` Connect replay protection).
    pub const OAUTH_NONCE: &str = "oauth_nonce";

    /// Key for the identity provider's tokens.
    pub const ACCESS_TOKEN: &str = "access_token";
}
