//! Types for identity provider OAuth responses.

use serde::{Deserialize, Serialize};

/// Tokens obtained via the authorization-code exchange.
///
/// Stored in the session so sign-out can hand the id token back to the
/// provider's end-session endpoint. Other fields of the provider's token
/// response are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The access token for user-info requests.
    pub access_token: String,
    /// The ID token (`OpenID` Connect).
    #[serde(default)]
    pub id_token: Option<String>,
}

/// The signed-in user as reported by the provider's user-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityUser {
    /// Stable subject identifier.
    pub sub: String,
    /// Email address, if the `email` scope was granted.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, if the `profile` scope was granted.
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_ignores_extra_fields() {
        let token: AccessToken = serde_json::from_str(
            r#"{"access_token":"at","token_type":"Bearer","expires_in":3600,"refresh_token":"rt"}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "at");
        assert!(token.id_token.is_none());
    }

    #[test]
    fn test_identity_user_minimal_claims() {
        let user: IdentityUser = serde_json::from_str(r#"{"sub":"idp|123"}"#).unwrap();
        assert_eq!(user.sub, "idp|123");
        assert!(user.email.is_none());
    }
}
