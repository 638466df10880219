//! Catalog CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run catalog and session store migrations
//! catalog-cli migrate
//!
//! # Load products from a YAML file, replacing the current catalog
//! catalog-cli seed catalog.yaml --clear
//!
//! # List categories that have at least one listed product
//! catalog-cli categories
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Catalog storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog from a YAML file
    Seed {
        /// Path to the YAML file
        file: String,

        /// Delete every existing catalog row first
        #[arg(long)]
        clear: bool,
    },
    /// List catalog categories
    Categories,
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
        Commands::Seed { file, clear } => commands::seed::products(&file, clear).await?,
        Commands::Categories => commands::categories::list().await?,
    }
    Ok(())
}
