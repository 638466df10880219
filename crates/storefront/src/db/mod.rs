//! Database operations for the catalog `PostgreSQL` database.
//!
//! ## Tables (schema `catalog`)
//!
//! - `product` - Product id and title
//! - `product_price` - One price per product
//! - `taxonomy_term` - Category names
//! - `product_category` - Product to category link
//! - `file` - Stored file URIs
//! - `product_image` - Product to image file link
//!
//! Sessions are kept by tower-sessions in the `tower_sessions` schema.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p catalog-cli -- migrate
//! ```

pub mod catalog;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use catalog_core::{CategoryFilter, ProductId};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::models::Product;

pub use catalog::{CatalogRepository, NewProduct};
pub use memory::MemoryCatalog;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to the catalog join.
///
/// Implemented by [`CatalogRepository`] for `PostgreSQL` and by
/// [`MemoryCatalog`] for tests and local development.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Products passing `filter`, ordered by category name, then title, then id.
    async fn products(&self, filter: &CategoryFilter) -> Result<Vec<Product>, RepositoryError>;

    /// Distinct category names of listed products, ascending.
    async fn categories(&self) -> Result<Vec<String>, RepositoryError>;

    /// Products with the given ids, in id order. Unknown ids are skipped.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// A single product, if it exists in the catalog join.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products_by_ids(&[id]).await?.into_iter().next())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
