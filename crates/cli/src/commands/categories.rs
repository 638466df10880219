//! List catalog categories.

use catalog_storefront::db::{CatalogRepository, CatalogStore};
use tracing::info;

/// Print the categories offered by the listing's drop-down.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let repo = CatalogRepository::new(pool);

    let categories = repo.categories().await?;
    if categories.is_empty() {
        info!("No categories with listed products");
        return Ok(());
    }

    info!("Categories ({}):", categories.len());
    for name in categories {
        info!("  {name}");
    }
    Ok(())
}
