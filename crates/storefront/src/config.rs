//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `KIOSK_BASE_URL` - Public URL for the storefront
//! - `KIOSK_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `KIOSK_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; not needed when `KIOSK_DOCUMENT_STORE=memory`)
//! - `IDENTITY_ISSUER_URL` - Identity provider base URL
//! - `IDENTITY_CLIENT_ID` - OAuth client ID
//! - `IDENTITY_CLIENT_SECRET` - OAuth client secret
//!
//! ## Optional
//! - `KIOSK_HOST` - Bind address (default: 127.0.0.1)
//! - `KIOSK_PORT` - Listen port (default: 3000)
//! - `KIOSK_DOCUMENT_STORE` - `postgres` (default) or `memory`
//! - `KIOSK_PROTECTED_PATHS` - Comma-separated path prefixes that require sign-in
//! - `IDENTITY_SCOPES` - OAuth scopes (default: `openid email profile`)
//! - `IDENTITY_AUTHORIZE_URL` - Authorization endpoint (default: `<issuer>/authorize`)
//! - `IDENTITY_TOKEN_URL` - Token endpoint (default: `<issuer>/oauth/token`)
//! - `IDENTITY_USERINFO_URL` - User info endpoint (default: `<issuer>/userinfo`)
//! - `IDENTITY_LOGOUT_URL` - End-session endpoint (default: `<issuer>/v2/logout`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Path prefixes that require a signed-in user unless overridden.
pub const DEFAULT_PROTECTED_PATHS: &[&str] = &["/account", "/api/orders", "/api/me"];

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which document store backend to use.
#[derive(Debug, Clone)]
pub enum DocumentStoreConfig {
    /// `PostgreSQL` `JSONB` documents (contains password).
    Postgres { database_url: SecretString },
    /// Process-local store; contents are lost on restart.
    Memory,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Document store backend
    pub document_store: DocumentStoreConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Path prefixes that require a signed-in user
    pub protected_paths: Vec<String>,
    /// Identity provider configuration
    pub identity: IdentityConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Identity provider (OAuth 2.0 / `OpenID` Connect) configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct IdentityConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Space-separated scopes requested at sign-in
    pub scopes: String,
    /// Authorization endpoint
    pub authorize_url: Url,
    /// Token endpoint
    pub token_url: Url,
    /// User info endpoint
    pub userinfo_url: Url,
    /// End-session endpoint
    pub logout_url: Url,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("authorize_url", &self.authorize_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("userinfo_url", &self.userinfo_url.as_str())
            .field("logout_url", &self.logout_url.as_str())
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let document_store = match get_env_or_default("KIOSK_DOCUMENT_STORE", "postgres").as_str()
        {
            "postgres" => DocumentStoreConfig::Postgres {
                database_url: get_database_url("KIOSK_DATABASE_URL")?,
            },
            "memory" => DocumentStoreConfig::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "KIOSK_DOCUMENT_STORE".to_string(),
                    format!("expected `postgres` or `memory`, got `{other}`"),
                ));
            }
        };
        let host = get_env_or_default("KIOSK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("KIOSK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("KIOSK_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("KIOSK_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("KIOSK_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        let session_secret = get_validated_secret("KIOSK_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "KIOSK_SESSION_SECRET")?;

        let protected_paths = get_optional_env("KIOSK_PROTECTED_PATHS").map_or_else(
            || {
                DEFAULT_PROTECTED_PATHS
                    .iter()
                    .map(|p| (*p).to_string())
                    .collect()
            },
            |raw| parse_path_list(&raw),
        );

        let identity = IdentityConfig::from_env()?;

        Ok(Self {
            document_store,
            host,
            port,
            base_url,
            session_secret,
            protected_paths,
            identity,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The OAuth redirect URI registered with the identity provider.
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.base_url)
    }
}

impl IdentityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let issuer = parse_url(
            "IDENTITY_ISSUER_URL",
            get_required_env("IDENTITY_ISSUER_URL")?.trim_end_matches('/'),
        )?;

        Ok(Self {
            client_id: get_required_env("IDENTITY_CLIENT_ID")?,
            client_secret: get_validated_secret("IDENTITY_CLIENT_SECRET")?,
            scopes: get_env_or_default("IDENTITY_SCOPES", "openid email profile"),
            authorize_url: endpoint_url(&issuer, "IDENTITY_AUTHORIZE_URL", "authorize")?,
            token_url: endpoint_url(&issuer, "IDENTITY_TOKEN_URL", "oauth/token")?,
            userinfo_url: endpoint_url(&issuer, "IDENTITY_USERINFO_URL", "userinfo")?,
            logout_url: endpoint_url(&issuer, "IDENTITY_LOGOUT_URL", "v2/logout")?,
        })
    }
}

/// Load the database URL on its own (`KIOSK_DATABASE_URL`, falling back to
/// `DATABASE_URL`).
///
/// Used by tooling that talks to the database without serving HTTP.
///
/// # Errors
///
/// Returns an error if neither variable is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    let _ = dotenvy::dotenv();
    get_database_url("KIOSK_DATABASE_URL")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Resolve an identity endpoint: explicit override, else `<issuer>/<default_path>`.
fn endpoint_url(issuer: &Url, key: &str, default_path: &str) -> Result<Url, ConfigError> {
    match get_optional_env(key) {
        Some(value) => parse_url(key, &value),
        None => Ok(join_issuer(issuer, default_path)),
    }
}

/// Append a path to the issuer URL, keeping any path the issuer already has.
fn join_issuer(issuer: &Url, path: &str) -> Url {
    let mut url = issuer.clone();
    let joined = format!("{}/{path}", issuer.path().trim_end_matches('/'));
    url.set_path(&joined);
    url
}

/// Split a comma-separated list of path prefixes, dropping blanks.
fn parse_path_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            if p.starts_with('/') {
                p.to_string()
            } else {
                format!("/{p}")
            }
        })
        .collect()
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
