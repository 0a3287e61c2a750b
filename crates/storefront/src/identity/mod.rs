//! Identity provider client.
//!
//! Sign-in is delegated to a hosted identity provider using the OAuth 2.0
//! authorization-code flow with `OpenID` Connect.
//!
//! # Flow
//!
//! 1. Build the authorization URL with `authorization_url()`
//! 2. Redirect the user to the provider's sign-in page
//! 3. The provider redirects back with an authorization code
//! 4. Exchange the code for tokens with `exchange_code()`
//! 5. Fetch the user's claims with `user_info()`
//!
//! # Example
//!
//! ```rust,ignore
//! let client = IdentityClient::new(&config.identity);
//!
//! let auth_url = client.authorization_url(&config.callback_url(), &state, &nonce);
//!
//! // After the callback
//! let token = client.exchange_code(&code, &config.callback_url()).await?;
//! let user = client.user_info(&token.access_token).await?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::config::IdentityConfig;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("OAuth error: {0}")]
    OAuth(String),
}

/// Client for the hosted identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    scopes: String,
    authorize_url: Url,
    token_url: Url,
    userinfo_url: Url,
    logout_url: Url,
}

impl IdentityClient {
    /// Create a new identity provider client.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client: reqwest::Client::new(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                scopes: config.scopes.clone(),
                authorize_url: config.authorize_url.clone(),
                token_url: config.token_url.clone(),
                userinfo_url: config.userinfo_url.clone(),
                logout_url: config.logout_url.clone(),
            }),
        }
    }

    /// Generate the authorization URL for sign-in.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL to redirect to after authentication
    /// * `state` - A random string stored in the session to prevent CSRF attacks
    /// * `nonce` - A random string for `OpenID` Connect replay protection
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str, nonce: &str) -> String {
        let mut url = self.inner.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.inner.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", &self.inner.scopes)
            .append_pair("state", state)
            .append_pair("nonce", nonce);
        url.into()
    }

    /// Generate the end-session URL.
    ///
    /// # Arguments
    ///
    /// * `id_token` - The ID token from the current session
    /// * `post_logout_redirect_uri` - Where to redirect after sign-out
    #[must_use]
    pub fn logout_url(&self, id_token: &str, post_logout_redirect_uri: &str) -> String {
        let mut url = self.inner.logout_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.inner.client_id)
            .append_pair("id_token_hint", id_token)
            .append_pair("post_logout_redirect_uri", post_logout_redirect_uri);
        url.into()
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Arguments
    ///
    /// * `code` - The authorization code from the OAuth callback
    /// * `redirect_uri` - The same redirect URI used in the authorization request
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, IdentityError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(self.inner.token_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IdentityError::OAuth(format!(
                "Token exchange failed: {text}"
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch the signed-in user's claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects the token.
    pub async fn user_info(&self, access_token: &str) -> Result<IdentityUser, IdentityError> {
        let response = self
            .inner
            .client
            .get(self.inner.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(IdentityError::OAuth(format!(
                "User info request failed ({status}): {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> IdentityClient {
        IdentityClient::new(&IdentityConfig {
            client_id: "kiosk-web".to_string(),
            client_secret: SecretString::from("s3cr3t"),
            scopes: "openid email".to_string(),
            authorize_url: Url::parse("https://idp.test/authorize").unwrap(),
            token_url: Url::parse("https://idp.test/oauth/token").unwrap(),
            userinfo_url: Url::parse("https://idp.test/userinfo").unwrap(),
            logout_url: Url::parse("https://idp.test/v2/logout").unwrap(),
        })
    }

    #[test]
    fn test_authorization_url_encodes_parameters() {
        let url = client().authorization_url("https://shop.test/auth/callback", "st&ate", "n1");
        let parsed = Url::parse(&url).unwrap();

        assert_eq!(parsed.path(), "/authorize");
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "kiosk-web".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "https://shop.test/auth/callback".into())));
        assert!(pairs.contains(&("scope".into(), "openid email".into())));
        assert!(pairs.contains(&("state".into(), "st&ate".into())));
        assert!(pairs.contains(&("nonce".into(), "n1".into())));
    }

    #[test]
    fn test_logout_url_carries_id_token_hint() {
        let url = client().logout_url("id.tok.en", "https://shop.test/");
        let parsed = Url::parse(&url).unwrap();

        assert_eq!(parsed.path(), "/v2/logout");
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("id_token_hint".into(), "id.tok.en".into())));
        assert!(pairs.contains(&("post_logout_redirect_uri".into(), "https://shop.test/".into())));
    }
}
