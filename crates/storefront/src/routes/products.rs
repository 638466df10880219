//! Product listing and category filter handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use catalog_core::CategoryFilter;

use crate::error::Result;
use crate::models::{Product, resolve_image_url};
use crate::services::FilteredListing;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub category: String,
    pub image_url: String,
}

impl ProductView {
    fn from_product(product: &Product, state: &AppState) -> Self {
        let catalog = &state.config().catalog;
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            price: product.unit_price(catalog.currency).display(),
            category: product.category.clone(),
            image_url: resolve_image_url(&product.image_uri, &catalog.files_base_url),
        }
    }
}

/// One entry of the category drop-down.
#[derive(Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Category filter form data.
///
/// The drop-down field was historically named `data`; both names are accepted.
#[derive(Debug, Deserialize)]
pub struct FilterForm {
    #[serde(default, alias = "data")]
    pub category: String,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryOption>,
    pub any_selected: bool,
    pub any_value: &'static str,
    pub active_category: String,
}

/// Display the product listing.
///
/// Shows the visitor's stashed filter result if one is waiting (consuming
/// it), otherwise the full catalog.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let (filter, products) = match state.filter_cache().take(&session).await? {
        Some(listing) => (listing.filter.clone(), listing.products.clone()),
        None => (
            CategoryFilter::Any,
            state.catalog().products(&CategoryFilter::Any).await?,
        ),
    };

    let categories = state
        .catalog()
        .categories()
        .await?
        .into_iter()
        .map(|name| {
            let selected = filter.name() == Some(name.as_str());
            CategoryOption { name, selected }
        })
        .collect();

    Ok(ProductsIndexTemplate {
        products: products
            .iter()
            .map(|p| ProductView::from_product(p, &state))
            .collect(),
        categories,
        any_selected: filter == CategoryFilter::Any,
        any_value: CategoryFilter::ANY_SENTINEL,
        active_category: filter.name().unwrap_or_default().to_owned(),
    })
}

/// Handle the category filter form.
///
/// Runs the filtered catalog query, stashes the result for the next listing
/// render and redirects there.
#[instrument(skip(state, session))]
pub async fn filter(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<FilterForm>,
) -> Result<Redirect> {
    let filter = CategoryFilter::parse(&form.category);
    let products = state.catalog().products(&filter).await?;

    tracing::info!(filter = %filter, count = products.len(), "Category filter applied");

    state
        .filter_cache()
        .stash(&session, FilteredListing { filter, products })
        .await?;

    Ok(Redirect::to("/products"))
}
