//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Session cart mutation and line-item assembly
//! - `filter_cache` - One-shot filtered listing handed from the filter form to the next render

pub mod cart;
pub mod filter_cache;

pub use cart::{CartChange, CartError, CartLineItem, CartService};
pub use filter_cache::{FilterCache, FilteredListing};
