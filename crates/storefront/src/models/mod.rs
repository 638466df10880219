//! Domain models for the storefront.

pub mod product;
pub mod session;

pub use product::{Product, resolve_image_url};
pub use session::keys as session_keys;
