//! Cart route handlers.
//!
//! The cart is a product id to quantity mapping kept in the session.
//! Mutations answer with a plain-text confirmation and an `HX-Trigger`
//! header so badge fragments can refresh.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::AppendHeaders,
};
use catalog_core::{CurrencyCode, Price};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::resolve_image_url;
use crate::services::{CartChange, CartLineItem, CartService};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: i32,
    pub title: String,
    /// Empty for unavailable products.
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub available: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Build the view from joined cart lines.
    ///
    /// Unavailable lines stay in the list but do not count toward the subtotal.
    #[must_use]
    pub fn from_items(items: &[CartLineItem], currency: CurrencyCode, files_base_url: &str) -> Self {
        let mut subtotal = Price::zero(currency);
        let mut item_count = 0_u64;

        let items = items
            .iter()
            .map(|item| {
                let quantity = item.quantity.get();
                item_count += u64::from(quantity);

                match &item.product {
                    Some(product) => {
                        let unit = product.unit_price(currency);
                        let line = unit.times(quantity);
                        subtotal = subtotal.plus(&line);
                        CartLineView {
                            product_id: product.id.as_i32(),
                            title: product.title.clone(),
                            image_url: resolve_image_url(&product.image_uri, files_base_url),
                            quantity,
                            price: unit.display(),
                            line_price: line.display(),
                            available: true,
                        }
                    }
                    None => CartLineView {
                        product_id: item.product_id.as_i32(),
                        title: format!("Unavailable product #{}", item.product_id),
                        image_url: String::new(),
                        quantity,
                        price: String::new(),
                        line_price: String::new(),
                        available: false,
                    },
                }
            })
            .collect();

        Self {
            items,
            subtotal: subtotal.display(),
            item_count,
        }
    }
}

/// Legacy cart action form: exactly one of `add` or `remove`.
#[derive(Debug, Deserialize)]
pub struct CartActionForm {
    pub add: Option<String>,
    pub remove: Option<String>,
}

/// Add to cart form data.
///
/// Fields stay raw strings so malformed or missing values reach the cart
/// service and come back as validation errors.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub product_id: String,
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    #[serde(default)]
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Plain-text confirmation with a refresh trigger.
type Confirmation = (AppendHeaders<[(&'static str, &'static str); 1]>, String);

fn confirmation(change: &CartChange) -> Confirmation {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        change.message(),
    )
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let items = state.cart().line_items(&session).await?;
    let catalog = &state.config().catalog;

    Ok(CartShowTemplate {
        cart: CartView::from_items(&items, catalog.currency, &catalog.files_base_url),
    })
}

/// Legacy add/remove action.
#[instrument(skip(state, session))]
pub async fn action(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartActionForm>,
) -> Result<Confirmation> {
    let cart = state.cart();
    let change = match (form.add, form.remove) {
        (Some(id), None) => cart.add(&session, &id, None).await?,
        (None, Some(id)) => cart.remove(&session, &id).await?,
        _ => {
            return Err(AppError::Validation(
                "expected exactly one of 'add' or 'remove'".to_string(),
            ));
        }
    };
    Ok(confirmation(&change))
}

/// Add item to cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Confirmation> {
    let change = state
        .cart()
        .add(&session, &form.product_id, form.quantity.as_deref())
        .await?;
    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("product_id", form.product_id.trim())]),
    );
    Ok(confirmation(&change))
}

/// Update cart item quantity.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Confirmation> {
    let change = state
        .cart()
        .update(&session, &form.product_id, &form.quantity)
        .await?;
    Ok(confirmation(&change))
}

/// Remove item from cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Confirmation> {
    let change = state.cart().remove(&session, &form.product_id).await?;
    Ok(confirmation(&change))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = CartService::load(&session).await?;
    Ok(CartCountTemplate {
        count: cart.total_quantity(),
    })
}
