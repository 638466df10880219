//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod category;
pub mod id;
pub mod price;

pub use cart::{Cart, CartLine, Quantity, QuantityError};
pub use category::CategoryFilter;
pub use id::*;
pub use price::{CurrencyCode, Price};
