//! Session-related types.

/// Session keys for visitor state.
pub mod keys {
    /// Key for the visitor's cart (product id to quantity).
    pub const CART: &str = "cart";

    /// Key for the token of the one-shot filtered listing.
    pub const CATALOG_FILTER: &str = "catalog_filter";
}
