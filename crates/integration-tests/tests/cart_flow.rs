//! Session cart behavior through the full router.

use axum::http::StatusCode;
use catalog_integration_tests::{TestApp, sample_catalog};

fn count_badge(n: u64) -> String {
    format!(r#"<span id="cart-count" class="badge">{n}</span>"#)
}

#[tokio::test]
async fn test_adding_twice_increments_quantity() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    let first = visitor.post_form("/cart/add", &[("product_id", "42")]).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, "Added product 42 to cart (quantity 1)");
    assert_eq!(first.header("hx-trigger"), Some("cart-updated"));
    assert!(visitor.has_session());

    let second = visitor.post_form("/cart/add", &[("product_id", "42")]).await;
    assert_eq!(second.body, "Added product 42 to cart (quantity 2)");

    let cart = visitor.get("/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body.matches(r#"data-product-id="42""#).count(), 1);
    assert!(cart.body.contains(r#"value="2""#));
    assert!(cart.body.contains("$39.98"));

    let count = visitor.get("/cart/count").await;
    assert_eq!(count.body.trim(), count_badge(2));
}

#[tokio::test]
async fn test_add_with_explicit_quantity() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    visitor
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "3")])
        .await;
    let resp = visitor.post_form("/cart/add", &[("product_id", "2")]).await;
    assert_eq!(resp.status, StatusCode::OK);

    let count = visitor.get("/cart/count").await;
    assert_eq!(count.body.trim(), count_badge(4));
}

#[tokio::test]
async fn test_remove_absent_product_is_noop() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    visitor.post_form("/cart/add", &[("product_id", "42")]).await;

    let resp = visitor.post_form("/cart/remove", &[("product_id", "5")]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "Product 5 was not in cart");

    let cart = visitor.get("/cart").await;
    assert!(cart.body.contains(r#"data-product-id="42""#));
}

#[tokio::test]
async fn test_remove_then_remove_again() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    visitor.post_form("/cart/add", &[("product_id", "42")]).await;

    let resp = visitor.post_form("/cart/remove", &[("product_id", "42")]).await;
    assert_eq!(resp.body, "Removed product 42 from cart");

    let resp = visitor.post_form("/cart/remove", &[("product_id", "42")]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "Product 42 was not in cart");

    let cart = visitor.get("/cart").await;
    assert!(cart.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_update_quantity_and_zero_removes() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    visitor.post_form("/cart/add", &[("product_id", "3")]).await;

    let resp = visitor
        .post_form("/cart/update", &[("product_id", "3"), ("quantity", "5")])
        .await;
    assert_eq!(resp.body, "Updated product 3 to quantity 5");

    let count = visitor.get("/cart/count").await;
    assert_eq!(count.body.trim(), count_badge(5));

    let resp = visitor
        .post_form("/cart/update", &[("product_id", "3"), ("quantity", "0")])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "Removed product 3 from cart");

    let count = visitor.get("/cart/count").await;
    assert_eq!(count.body.trim(), count_badge(0));
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    for raw in ["abc", "", "-4", "0", "1; DROP TABLE catalog.product"] {
        let resp = visitor.post_form("/cart/add", &[("product_id", raw)]).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "id {raw:?}");
    }

    let resp = visitor.post_form("/cart/remove", &[("product_id", "x")]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let count = visitor.get("/cart/count").await;
    assert_eq!(count.body.trim(), count_badge(0));
}

#[tokio::test]
async fn test_zero_quantity_add_is_rejected() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    let resp = visitor
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "0")])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    let resp = visitor.post_form("/cart/add", &[("product_id", "999")]).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body, "Not found: product 999");

    let resp = visitor
        .post_form("/cart/update", &[("product_id", "999"), ("quantity", "2")])
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_cart_action_form() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    let resp = visitor.post_form("/cart", &[("add", "2")]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "Added product 2 to cart (quantity 1)");

    let resp = visitor.post_form("/cart", &[("remove", "2")]).await;
    assert_eq!(resp.body, "Removed product 2 from cart");

    let resp = visitor.post_form("/cart", &[]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = visitor
        .post_form("/cart", &[("add", "1"), ("remove", "2")])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let app = TestApp::new(sample_catalog());
    let mut alice = app.visitor();
    let mut bob = app.visitor();

    alice.post_form("/cart/add", &[("product_id", "1")]).await;

    let count = bob.get("/cart/count").await;
    assert_eq!(count.body.trim(), count_badge(0));

    let cart = bob.get("/cart").await;
    assert!(cart.body.contains("Your cart is empty."));

    let count = alice.get("/cart/count").await;
    assert_eq!(count.body.trim(), count_badge(1));
}

#[tokio::test]
async fn test_malformed_quantity_is_rejected() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    for raw in ["abc", "-1", "", "2.5"] {
        let resp = visitor
            .post_form("/cart/add", &[("product_id", "1"), ("quantity", raw)])
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "add quantity {raw:?}");
        assert!(resp.body.starts_with("Validation error"), "{}", resp.body);
    }

    visitor.post_form("/cart/add", &[("product_id", "1")]).await;
    for raw in ["abc", "-1", ""] {
        let resp = visitor
            .post_form("/cart/update", &[("product_id", "1"), ("quantity", raw)])
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "update quantity {raw:?}");
    }

    let count = visitor.get("/cart/count").await;
    assert_eq!(count.body.trim(), count_badge(1));
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let app = TestApp::new(sample_catalog());
    let mut visitor = app.visitor();

    let resp = visitor.post_form("/cart/add", &[]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = visitor.post_form("/cart/add", &[("quantity", "2")]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = visitor.post_form("/cart/update", &[("product_id", "1")]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = visitor.post_form("/cart/update", &[("quantity", "1")]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = visitor.post_form("/cart/remove", &[]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}
