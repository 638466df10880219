//! Session cart service.
//!
//! The cart is a product id to quantity mapping stored in the visitor's
//! session under [`session_keys::CART`]. Mutations are read-modify-write on
//! the session with no locking: two concurrent requests from the same visitor
//! race and the last write wins.

mod error;

pub use error::CartError;

use std::collections::HashMap;

use tower_sessions::Session;
use tracing::instrument;

use catalog_core::{Cart, ProductId, Quantity};

use crate::db::CatalogStore;
use crate::models::{Product, session_keys};

/// Outcome of a cart mutation, rendered as a plain-text confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// Units were added; `quantity` is the new total for the product.
    Added {
        product_id: ProductId,
        quantity: Quantity,
    },
    /// A remove request; `was_present` is false when nothing was removed.
    Removed {
        product_id: ProductId,
        was_present: bool,
    },
    /// Quantity was set; `None` means the entry is gone.
    Updated {
        product_id: ProductId,
        quantity: Option<Quantity>,
    },
}

impl CartChange {
    /// Confirmation message for the visitor.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Added {
                product_id,
                quantity,
            } => format!(
                "Added product {product_id} to cart (quantity {})",
                quantity.get()
            ),
            Self::Removed {
                product_id,
                was_present: true,
            }
            | Self::Updated {
                product_id,
                quantity: None,
            } => format!("Removed product {product_id} from cart"),
            Self::Removed {
                product_id,
                was_present: false,
            } => format!("Product {product_id} was not in cart"),
            Self::Updated {
                product_id,
                quantity: Some(quantity),
            } => format!(
                "Updated product {product_id} to quantity {}",
                quantity.get()
            ),
        }
    }
}

/// One cart entry joined with its catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// `None` when the product no longer appears in the catalog join.
    pub product: Option<Product>,
}

/// Cart operations over an injected session and catalog.
pub struct CartService<'a> {
    catalog: &'a dyn CatalogStore,
}

impl<'a> CartService<'a> {
    /// Create a cart service reading products from `catalog`.
    #[must_use]
    pub const fn new(catalog: &'a dyn CatalogStore) -> Self {
        Self { catalog }
    }

    /// Load the visitor's cart, or an empty one if none is stored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` if the session store fails or the stored
    /// value cannot be decoded.
    pub async fn load(session: &Session) -> Result<Cart, CartError> {
        Ok(session
            .get::<Cart>(session_keys::CART)
            .await?
            .unwrap_or_default())
    }

    async fn save(session: &Session, cart: &Cart) -> Result<(), CartError> {
        session.insert(session_keys::CART, cart).await?;
        Ok(())
    }

    /// Add units of a product. Repeat adds keep incrementing.
    ///
    /// `raw_quantity` defaults to one when the field was not submitted.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidId` for a malformed id,
    /// `CartError::InvalidQuantity` for a malformed or zero quantity, and
    /// `CartError::ProductNotFound` if the product is not in the catalog.
    #[instrument(skip(self, session))]
    pub async fn add(
        &self,
        session: &Session,
        raw_id: &str,
        raw_quantity: Option<&str>,
    ) -> Result<CartChange, CartError> {
        let product_id = ProductId::parse(raw_id)?;
        let quantity = raw_quantity.map_or(Ok(Quantity::ONE), Quantity::parse)?;
        self.ensure_exists(product_id).await?;

        let mut cart = Self::load(session).await?;
        let quantity = cart.add(product_id, quantity);
        Self::save(session, &cart).await?;

        tracing::info!(%product_id, quantity = quantity.get(), "Added to cart");
        Ok(CartChange::Added {
            product_id,
            quantity,
        })
    }

    /// Remove a product. Removing a product that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidId` for a malformed id.
    #[instrument(skip(self, session))]
    pub async fn remove(&self, session: &Session, raw_id: &str) -> Result<CartChange, CartError> {
        let product_id = ProductId::parse(raw_id)?;

        let mut cart = Self::load(session).await?;
        let was_present = cart.remove(product_id).is_some();
        if was_present {
            Self::save(session, &cart).await?;
            tracing::info!(%product_id, "Removed from cart");
        }

        Ok(CartChange::Removed {
            product_id,
            was_present,
        })
    }

    /// Set the quantity of a product. Zero removes it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidId` for a malformed id,
    /// `CartError::InvalidQuantity` for a malformed quantity, and
    /// `CartError::ProductNotFound` when setting a positive quantity for a
    /// product that is not in the catalog.
    #[instrument(skip(self, session))]
    pub async fn update(
        &self,
        session: &Session,
        raw_id: &str,
        raw_quantity: &str,
    ) -> Result<CartChange, CartError> {
        let product_id = ProductId::parse(raw_id)?;
        let quantity = Quantity::parse_count(raw_quantity)?;
        if quantity > 0 {
            self.ensure_exists(product_id).await?;
        }

        let mut cart = Self::load(session).await?;
        let stored = cart.set(product_id, quantity);
        Self::save(session, &cart).await?;

        Ok(CartChange::Updated {
            product_id,
            quantity: stored,
        })
    }

    /// One line item per cart entry, in product id order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the catalog query fails.
    #[instrument(skip(self, session))]
    pub async fn line_items(&self, session: &Session) -> Result<Vec<CartLineItem>, CartError> {
        let cart = Self::load(session).await?;
        if cart.is_empty() {
            return Ok(Vec::new());
        }

        let mut products: HashMap<ProductId, Product> = self
            .catalog
            .products_by_ids(&cart.product_ids())
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(cart
            .iter()
            .map(|(product_id, quantity)| {
                let product = products.remove(&product_id);
                if product.is_none() {
                    tracing::warn!(%product_id, "Cart references product missing from catalog");
                }
                CartLineItem {
                    product_id,
                    quantity,
                    product,
                }
            })
            .collect())
    }

    async fn ensure_exists(&self, product_id: ProductId) -> Result<(), CartError> {
        match self.catalog.product(product_id).await? {
            Some(_) => Ok(()),
            None => Err(CartError::ProductNotFound(product_id)),
        }
    }
}
