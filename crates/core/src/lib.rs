//! Catalog Core - Shared domain types.
//!
//! This crate provides the types used across the catalog components:
//! - `storefront` - Product listing, category filter and session cart
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Cart arithmetic and filter parsing live here so they can be
//! tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, category filters and the cart mapping

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
