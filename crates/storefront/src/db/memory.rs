//! In-memory catalog for tests and local development.

use std::collections::BTreeSet;

use async_trait::async_trait;

use catalog_core::{CategoryFilter, ProductId};

use super::{CatalogStore, RepositoryError};
use crate::models::Product;

/// A fixed product list served with the same ordering as the SQL join.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
    unavailable: bool,
}

impl MemoryCatalog {
    /// Create a catalog holding `products`.
    #[must_use]
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        Self {
            products,
            unavailable: false,
        }
    }

    /// A catalog whose every query fails like a lost database connection.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            products: Vec::new(),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn products(&self, filter: &CategoryFilter) -> Result<Vec<Product>, RepositoryError> {
        self.check()?;
        Ok(self
            .products
            .iter()
            .filter(|p| filter.matches(&p.category))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        self.check()?;
        let names: BTreeSet<&str> = self.products.iter().map(|p| p.category.as_str()).collect();
        Ok(names.into_iter().map(str::to_owned).collect())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        self.check()?;
        let mut found: Vec<Product> = self
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()
    }
}
