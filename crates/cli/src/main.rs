//! Kiosk CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Create the documents and sessions tables
//! kiosk migrate
//!
//! # Upload the built-in product catalog
//! kiosk seed products
//!
//! # Upload a catalog from another YAML file
//! kiosk seed products --file catalog.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kiosk")]
#[command(author, version, about = "Kiosk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the document store
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upload the product catalog
    Products {
        /// YAML catalog to upload instead of the built-in one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(file.as_deref()).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_products_with_file() {
        let cli = Cli::try_parse_from(["kiosk", "seed", "products", "--file", "x.yaml"])
            .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Seed {
                target: SeedTarget::Products { file },
            } => assert_eq!(file, Some(PathBuf::from("x.yaml"))),
            Commands::Migrate => panic!("expected seed command"),
        }
    }
}
