//! Seed the document store with the product catalog.
//!
//! Reads the built-in catalog (or a YAML file given with `--file`) and
//! upserts every product into the `products` collection. Running it again
//! overwrites the same documents rather than adding new ones.

use std::path::Path;

use tracing::{error, info};

use kiosk_storefront::config::database_url_from_env;
use kiosk_storefront::db::{PgDocumentStore, create_pool};
use kiosk_storefront::services::catalog::{builtin_catalog, parse_catalog, upload_products};

/// Upload the product catalog.
///
/// # Arguments
///
/// * `file_path` - Alternate YAML catalog; the built-in one when `None`
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or parsed, the database
/// is unreachable, or any product fails to upload.
pub async fn products(file_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    // Parse before connecting so a bad file fails fast
    let products = match file_path {
        Some(path) => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            info!(path = %path.display(), "Loading catalog from file");
            let content = tokio::fs::read_to_string(path).await?;
            parse_catalog(&content)?
        }
        None => {
            info!("Loading built-in catalog");
            builtin_catalog()?
        }
    };

    info!(products = products.len(), "Parsed catalog");

    let database_url = database_url_from_env()?;
    let pool = create_pool(&database_url).await?;
    info!("Connected to database");

    let store = PgDocumentStore::new(pool);
    let report = upload_products(&store, &products).await;

    info!("Seeding complete!");
    info!("  Products written: {}", report.written);

    if !report.is_complete() {
        error!("  Errors: {}", report.failed.len());
        for (id, err) in &report.failed {
            error!("    - {id}: {err}");
        }
        return Err(format!("{} products failed to upload", report.failed.len()).into());
    }

    Ok(())
}
