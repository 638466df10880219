//! Health checks, error pages and request tracing through the full router.

use axum::http::StatusCode;
use catalog_integration_tests::{TestApp, sample_catalog};
use catalog_storefront::db::MemoryCatalog;

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    let resp = visitor.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    let resp = visitor.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unavailable_catalog() {
    let app = TestApp::new(MemoryCatalog::unavailable());
    let mut visitor = app.visitor();

    let resp = visitor.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = visitor.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);

    let resp = visitor.get("/products").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, "Internal server error");

    let resp = visitor.post_form("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    let first = visitor.get("/health").await;
    let second = visitor.get("/health").await;

    let first_id = first.header("x-request-id").map(str::to_owned);
    let second_id = second.header("x-request-id").map(str::to_owned);
    assert!(first_id.is_some());
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new(sample_catalog());
    let resp = app.visitor().get("/node/7").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
