//! Kiosk storefront - JSON API for the product catalog, orders and stores.
//!
//! # Architecture
//!
//! - Axum web framework serving JSON
//! - Document store backed by `PostgreSQL` JSONB (or memory for local dev)
//! - OAuth 2.0 / `OpenID` Connect identity provider for sign-in
//! - tower-sessions for the signed-in user

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use kiosk_storefront::config::{DocumentStoreConfig, StorefrontConfig};
use kiosk_storefront::db::{self, DocumentStore, MemoryDocumentStore, PgDocumentStore};
use kiosk_storefront::middleware::create_session_layer;
use kiosk_storefront::routes;
use kiosk_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Needed before tracing for Sentry init (also loads .env)
    let config = StorefrontConfig::from_env()?;

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kiosk_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: kiosk migrate
    let app = match &config.document_store {
        DocumentStoreConfig::Postgres { database_url } => {
            let pool = db::create_pool(database_url).await?;
            tracing::info!("Database pool created");

            let session_layer = create_session_layer(PostgresStore::new(pool.clone()), &config);
            let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool));
            routes::app(AppState::new(config.clone(), store), session_layer)
        }
        DocumentStoreConfig::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");

            let session_layer = create_session_layer(MemoryStore::default(), &config);
            let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
            routes::app(AppState::new(config.clone(), store), session_layer)
        }
    };

    // Sentry layers (outermost for full request coverage)
    let app = app
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
