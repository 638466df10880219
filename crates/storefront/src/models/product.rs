//! Product rows produced by the catalog join.

use catalog_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;

/// URI scheme for files stored in the public files directory.
const PUBLIC_SCHEME: &str = "public://";

/// One product as produced by the catalog join.
///
/// Rows are read-only and live for a single request.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub category: String,
    /// Stored file URI, e.g. `public://products/mug.jpg`.
    pub image_uri: String,
}

impl Product {
    /// Unit price in the catalog currency.
    #[must_use]
    pub const fn unit_price(&self, currency: CurrencyCode) -> Price {
        Price::new(self.price, currency)
    }
}

/// Resolve a stored file URI to a URL the browser can load.
///
/// `public://` URIs are rewritten under `files_base_url`. Absolute URLs and
/// root-relative paths are returned unchanged; bare relative paths are
/// treated like `public://` ones.
#[must_use]
pub fn resolve_image_url(uri: &str, files_base_url: &str) -> String {
    if uri.starts_with("http://") || uri.starts_with("https://") || uri.starts_with('/') {
        return uri.to_owned();
    }

    let path = uri.strip_prefix(PUBLIC_SCHEME).unwrap_or(uri);
    format!(
        "{}/{}",
        files_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
