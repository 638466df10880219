//! Integration test harness for the catalog storefront.
//!
//! Builds the full router (sessions, tracing, request ids) over an in-memory
//! catalog and session store and drives it with `tower::ServiceExt::oneshot`.
//! No database or running server is needed.
//!
//! ```rust,ignore
//! let app = TestApp::new(sample_catalog());
//! let mut visitor = app.visitor();
//! let resp = visitor.post_form("/cart/add", &[("product_id", "42")]).await;
//! assert_eq!(resp.status, StatusCode::OK);
//! ```

#![allow(clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use catalog_core::ProductId;
use catalog_storefront::config::{CatalogConfig, StorefrontConfig};
use catalog_storefront::db::MemoryCatalog;
use catalog_storefront::middleware::create_session_layer;
use catalog_storefront::models::Product;
use catalog_storefront::routes;
use catalog_storefront::state::AppState;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

/// Configuration used by every test app.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        catalog: CatalogConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Build a product row.
#[must_use]
pub fn product(id: i32, title: &str, cents: i64, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Decimal::new(cents, 2),
        category: category.to_string(),
        image_uri: format!("public://products/{id}.jpg"),
    }
}

/// Two kitchen products and two outdoor products.
#[must_use]
pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::new(vec![
        product(1, "Chef Knife", 4900, "Kitchen"),
        product(2, "Mug", 850, "Kitchen"),
        product(3, "Tent", 12000, "Outdoor"),
        product(42, "Lantern", 1999, "Outdoor"),
    ])
}

/// The assembled application.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Build the application over `catalog` with an in-memory session store.
    #[must_use]
    pub fn new(catalog: MemoryCatalog) -> Self {
        let config = test_config();
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, Arc::new(catalog));
        Self {
            router: routes::app(state, session_layer),
        }
    }

    /// A new visitor with no session cookie yet.
    #[must_use]
    pub fn visitor(&self) -> Visitor {
        Visitor {
            router: self.router.clone(),
            cookie: None,
        }
    }
}

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One browser: carries the session cookie between requests.
pub struct Visitor {
    router: Router,
    cookie: Option<String>,
}

impl Visitor {
    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// Send a url-encoded form POST.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Whether the visitor has been issued a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form)
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
