//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (catalog reachable)
//! GET  /                       - Redirect to /products
//!
//! # Products
//! GET  /products               - Product listing (consumes a stashed filter result)
//! POST /products/filter        - Category filter form (stashes result, redirects)
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart                   - Legacy action form (add=<id> or remove=<id>)
//! POST /cart/add               - Add to cart (plain-text confirmation)
//! POST /cart/update            - Set quantity, zero removes
//! POST /cart/remove            - Remove item
//! GET  /cart/count             - Cart count badge (fragment)
//! ```

pub mod cart;
pub mod health;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::make_request_span;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/filter", post(products::filter))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::action))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
}

/// Assemble the full application: health checks, pages, sessions and
/// request tracing.
///
/// The session store is injected so tests can run against an in-memory store.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(session_layer)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
