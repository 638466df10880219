//! Visitor cart: a mapping from product id to quantity.
//!
//! The cart lives in server-side session state. It holds no product data,
//! only ids and quantities; line-item display re-reads the catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities in a cart are always at least one.
    #[error("quantity must be at least 1")]
    Zero,
    /// The input is not a non-negative integer.
    #[error("quantity must be a whole number, got '{0}'")]
    Invalid(String),
}

/// A positive item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `n` is zero.
    pub const fn new(n: u32) -> Result<Self, QuantityError> {
        if n == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(n))
    }

    /// Parse a raw count from untrusted input such as a form field.
    ///
    /// Zero is accepted here; callers decide whether it means "remove".
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Invalid`] for empty, negative or non-numeric input.
    pub fn parse_count(s: &str) -> Result<u32, QuantityError> {
        let trimmed = s.trim();
        trimmed
            .parse::<u32>()
            .map_err(|_| QuantityError::Invalid(trimmed.to_owned()))
    }

    /// Parse a positive quantity from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Invalid`] for malformed input and
    /// [`QuantityError::Zero`] for zero.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        Self::new(Self::parse_count(s)?)
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Add two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

/// One serialized cart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Session-scoped mapping of product id to quantity.
///
/// Entries are kept ordered by product id. Serialized as a list of
/// [`CartLine`]s so the session encoding does not depend on map-key support.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: BTreeMap<ProductId, Quantity>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a product, incrementing any existing entry.
    ///
    /// Returns the new quantity for that product.
    pub fn add(&mut self, product_id: ProductId, quantity: Quantity) -> Quantity {
        let entry = self
            .lines
            .entry(product_id)
            .and_modify(|existing| *existing = existing.saturating_add(quantity))
            .or_insert(quantity);
        *entry
    }

    /// Remove a product. Removing an absent product is a no-op.
    ///
    /// Returns the quantity that was removed, if any.
    pub fn remove(&mut self, product_id: ProductId) -> Option<Quantity> {
        self.lines.remove(&product_id)
    }

    /// Set the quantity for a product. A count of zero removes the entry.
    ///
    /// Returns the quantity now stored, if any.
    pub fn set(&mut self, product_id: ProductId, count: u32) -> Option<Quantity> {
        match Quantity::new(count) {
            Ok(quantity) => {
                self.lines.insert(product_id, quantity);
                Some(quantity)
            }
            Err(_) => {
                self.lines.remove(&product_id);
                None
            }
        }
    }

    /// Quantity stored for a product.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> Option<Quantity> {
        self.lines.get(&product_id).copied()
    }

    /// Product ids in the cart, ascending.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.keys().copied().collect()
    }

    /// Iterate entries in product id order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, Quantity)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.values().map(|q| u64::from(q.get())).sum()
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add(line.product_id, line.quantity);
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
            .into_iter()
            .map(|(product_id, quantity)| CartLine {
                product_id,
                quantity,
            })
            .collect()
    }
}
