//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::CatalogStore;
use crate::services::{CartService, FilterCache};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and replaces any ambient
/// global state: every handler receives the catalog, the filter cache and
/// the configuration through it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogStore>,
    filter_cache: FilterCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Catalog backend (`PostgreSQL` in production)
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Arc<dyn CatalogStore>) -> Self {
        let filter_cache = FilterCache::new(config.catalog.filter_cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                filter_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog backend.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogStore {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the one-shot filter cache.
    #[must_use]
    pub fn filter_cache(&self) -> &FilterCache {
        &self.inner.filter_cache
    }

    /// Cart operations backed by this state's catalog.
    #[must_use]
    pub fn cart(&self) -> CartService<'_> {
        CartService::new(self.catalog())
    }
}
