//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. Request ID (reuse upstream `x-request-id` or generate a UUID)
//! 3. `TraceLayer` (request span carrying the request ID)
//! 4. Session layer (tower-sessions, `PostgreSQL` store in production)

pub mod request_id;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, make_request_span};
pub use session::create_session_layer;
