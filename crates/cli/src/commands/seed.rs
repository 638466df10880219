//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - title: Chef Knife
//!     price: "49.00"
//!     category: Kitchen
//!     image: public://knife.jpg
//! ```
//!
//! The whole file is validated before connecting to the database.

use std::path::Path;
use std::str::FromStr;

use catalog_core::CategoryFilter;
use catalog_storefront::db::{CatalogRepository, NewProduct};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

/// Validation failures for a seed file entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("product #{index}: title is empty")]
    EmptyTitle { index: usize },

    #[error("product #{index}: category is empty")]
    EmptyCategory { index: usize },

    #[error("product #{index}: category '{name}' is reserved for the all-categories option")]
    ReservedCategory { index: usize, name: String },

    #[error("product #{index}: invalid price '{value}'")]
    InvalidPrice { index: usize, value: String },

    #[error("product #{index}: image uri is empty")]
    EmptyImage { index: usize },
}

/// Top-level seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// One product entry as written in the seed file.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub title: String,
    pub price: String,
    pub category: String,
    pub image: String,
}

/// Validate every entry and convert to insertable rows.
///
/// Returns all validation errors rather than stopping at the first one.
pub fn validate(file: SeedFile) -> Result<Vec<NewProduct>, Vec<CliError>> {
    let mut products = Vec::with_capacity(file.products.len());
    let mut errors = Vec::new();

    for (index, entry) in file.products.into_iter().enumerate() {
        let index = index + 1;
        let before = errors.len();

        let title = entry.title.trim().to_owned();
        if title.is_empty() {
            errors.push(CliError::EmptyTitle { index });
        }

        let category = entry.category.trim().to_owned();
        if category.is_empty() {
            errors.push(CliError::EmptyCategory { index });
        } else if CategoryFilter::parse(&category) == CategoryFilter::Any {
            errors.push(CliError::ReservedCategory {
                index,
                name: category.clone(),
            });
        }

        let price = match Decimal::from_str(entry.price.trim()) {
            Ok(p) if !p.is_sign_negative() && p.scale() <= 2 => Some(p),
            _ => {
                errors.push(CliError::InvalidPrice {
                    index,
                    value: entry.price.clone(),
                });
                None
            }
        };

        let image_uri = entry.image.trim().to_owned();
        if image_uri.is_empty() {
            errors.push(CliError::EmptyImage { index });
        }

        match price {
            Some(price) if errors.len() == before => products.push(NewProduct {
                title,
                price,
                category,
                image_uri,
            }),
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(products)
    } else {
        Err(errors)
    }
}

/// Seed products from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `clear_existing` - If true, delete the current catalog first
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry fails
/// validation, or database operations fail.
pub async fn products(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    let content = tokio::fs::read_to_string(path).await?;
    let file: SeedFile = serde_yaml::from_str(&content)?;

    let products = match validate(file) {
        Ok(products) => products,
        Err(errors) => {
            error!("Seed file validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    info!(products = products.len(), "Seed file validated");

    let repo = CatalogRepository::new(super::connect().await?);

    if clear_existing {
        info!("Clearing existing catalog");
        repo.clear().await?;
    }

    let ids = repo.insert_products(&products).await?;
    info!("Seeding complete: {} products inserted", ids.len());

    Ok(())
}
