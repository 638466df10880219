//! One-shot filtered listing.
//!
//! The category filter form stashes its result here and redirects; the next
//! listing render takes it. Results live in an in-process `moka` cache keyed
//! by a random token, and only the token is written to the session. Taking a
//! listing removes both, so it is served at most once. Unread listings expire
//! after the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use catalog_core::CategoryFilter;

use crate::models::{Product, session_keys};

/// Upper bound on stashed listings held at once.
const MAX_STASHED_LISTINGS: u64 = 10_000;

/// A filter submission and the products it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredListing {
    pub filter: CategoryFilter,
    pub products: Vec<Product>,
}

/// Short-lived store for filter results awaiting their first render.
#[derive(Clone)]
pub struct FilterCache {
    entries: Cache<Uuid, Arc<FilteredListing>>,
}

impl FilterCache {
    /// Create a cache whose entries expire `ttl` after insertion.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_STASHED_LISTINGS)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    /// Stash a listing for the visitor, replacing any unread one.
    ///
    /// # Errors
    ///
    /// Returns the session error if the token cannot be read or written.
    #[instrument(skip(self, session, listing), fields(filter = %listing.filter, count = listing.products.len()))]
    pub async fn stash(
        &self,
        session: &Session,
        listing: FilteredListing,
    ) -> Result<(), tower_sessions::session::Error> {
        if let Some(previous) = session.remove::<Uuid>(session_keys::CATALOG_FILTER).await? {
            self.entries.invalidate(&previous).await;
        }

        let token = Uuid::new_v4();
        self.entries.insert(token, Arc::new(listing)).await;
        session.insert(session_keys::CATALOG_FILTER, token).await
    }

    /// Take the visitor's stashed listing, if any. A second call returns `None`.
    ///
    /// # Errors
    ///
    /// Returns the session error if the token cannot be read or removed.
    #[instrument(skip(self, session))]
    pub async fn take(
        &self,
        session: &Session,
    ) -> Result<Option<Arc<FilteredListing>>, tower_sessions::session::Error> {
        let Some(token) = session.remove::<Uuid>(session_keys::CATALOG_FILTER).await? else {
            return Ok(None);
        };

        let listing = self.entries.get(&token).await;
        self.entries.invalidate(&token).await;
        if listing.is_none() {
            tracing::debug!("Stashed listing expired before it was read");
        }
        Ok(listing)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_core::ProductId;
    use rust_decimal::Decimal;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn listing(category: &str) -> FilteredListing {
        FilteredListing {
            filter: CategoryFilter::parse(category),
            products: vec![Product {
                id: ProductId::new(1),
                title: "Mug".to_string(),
                price: Decimal::new(300, 2),
                category: category.to_string(),
                image_uri: "public://mug.jpg".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_take_is_read_then_clear() {
        let cache = FilterCache::new(Duration::from_secs(60));
        let session = session();

        cache.stash(&session, listing("Kitchen")).await.unwrap();

        let first = cache.take(&session).await.unwrap().unwrap();
        assert_eq!(first.filter, CategoryFilter::parse("Kitchen"));
        assert_eq!(first.products.len(), 1);

        assert!(cache.take(&session).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_take_without_stash_is_none() {
        let cache = FilterCache::new(Duration::from_secs(60));
        assert!(cache.take(&session()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stash_replaces_unread_listing() {
        let cache = FilterCache::new(Duration::from_secs(60));
        let session = session();

        cache.stash(&session, listing("Kitchen")).await.unwrap();
        cache.stash(&session, listing("Shoes")).await.unwrap();

        let taken = cache.take(&session).await.unwrap().unwrap();
        assert_eq!(taken.filter, CategoryFilter::parse("Shoes"));
        cache.entries.run_pending_tasks().await;
        assert_eq!(cache.entries.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let cache = FilterCache::new(Duration::from_secs(60));
        let alice = session();
        let bob = session();

        cache.stash(&alice, listing("Kitchen")).await.unwrap();
        assert!(cache.take(&bob).await.unwrap().is_none());
        assert!(cache.take(&alice).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_listing_is_none() {
        let cache = FilterCache::new(Duration::from_millis(20));
        let session = session();

        cache.stash(&session, listing("Kitchen")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(cache.take(&session).await.unwrap().is_none());
    }
}
