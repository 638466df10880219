//! Cart error types.

use thiserror::Error;

use catalog_core::{IdError, ProductId, QuantityError};

use crate::db::RepositoryError;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The submitted product id is malformed.
    #[error("invalid product id: {0}")]
    InvalidId(#[from] IdError),

    /// The submitted quantity is not allowed.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// The product does not exist in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Catalog lookup failed.
    #[error("catalog error: {0}")]
    Repository(#[from] RepositoryError),

    /// Reading or writing the cart in the session failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}
