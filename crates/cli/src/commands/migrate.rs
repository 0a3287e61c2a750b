//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! kiosk migrate
//! ```
//!
//! # Environment Variables
//!
//! - `KIOSK_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Document store migrations live in `crates/storefront/migrations/`. The
//! session table is owned by tower-sessions-sqlx-store and created through
//! its own `migrate`.

use tower_sessions_sqlx_store::PostgresStore;

use kiosk_storefront::config::{ConfigError, database_url_from_env};
use kiosk_storefront::db::create_pool;

/// Errors from running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url_from_env()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running document store migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
