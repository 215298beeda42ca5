//! End-to-end cart scenarios against a live storefront.
//!
//! Each test drives one browser session through the same forms the pages
//! render and checks the HTML the server sends back.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::Value;
use toolshop_core::{OrderSummary, Price};
use toolshop_integration_tests::TestServer;

const LASER_LEVEL: &str = "1";
const TAPE_MEASURE: &str = "2";

async fn add(server: &TestServer, product_id: &str, quantity: &str) -> String {
    let resp = server
        .htmx_post(
            "/cart/add",
            &[("product_id", product_id), ("quantity", quantity)],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");
    resp.text().await.unwrap()
}

async fn api_cart(server: &TestServer) -> Value {
    server
        .client
        .get(server.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

// ============================================================================
// Adding
// ============================================================================

#[tokio::test]
async fn test_add_two_laser_levels() {
    let server = TestServer::spawn().await;

    let badge = add(&server, LASER_LEVEL, "2").await;
    assert!(badge.contains(">2<"));

    // Header badge on a full page render
    let products = server.page("/products").await;
    assert!(products.contains("class=\"cart-count"));

    let cart = server.page("/cart").await;
    assert!(cart.contains("Laser Level"));
    assert!(cart.contains("$49.99"));
    assert!(cart.contains("value=\"2\""));
    assert!(cart.contains("$99.98"));
    assert!(cart.contains("Discount(5%)"));
    assert!(cart.contains("-$5.00"));
    assert!(cart.contains("$10.00"));
    assert!(cart.contains("$104.98"));
}

#[tokio::test]
async fn test_adding_same_product_merges_lines() {
    let server = TestServer::spawn().await;

    add(&server, LASER_LEVEL, "1").await;
    let badge = add(&server, LASER_LEVEL, "2").await;
    assert!(badge.contains(">3<"));

    let cart = api_cart(&server).await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["lines"][0]["quantity"], 3);
}

#[tokio::test]
async fn test_two_products_in_one_cart() {
    let server = TestServer::spawn().await;

    add(&server, LASER_LEVEL, "2").await;
    let badge = add(&server, TAPE_MEASURE, "1").await;
    assert!(badge.contains(">3<"));

    let cart = server.page("/cart").await;
    assert_eq!(cart.matches("<tr class=\"cart-line\"").count(), 2);
    assert!(cart.contains("Laser Level"));
    assert!(cart.contains("Smart Tape Measure"));
    assert!(cart.contains("$124.48"));
    assert!(cart.contains("-$6.22"));
    assert!(cart.contains("$128.26"));
}

#[tokio::test]
async fn test_sessions_have_separate_carts() {
    let server = TestServer::spawn().await;
    add(&server, LASER_LEVEL, "1").await;

    let other = TestServer::new_client();
    let body = other
        .get(server.url("/cart"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Your cart is empty."));
}

// ============================================================================
// Updating & Removing
// ============================================================================

#[tokio::test]
async fn test_update_quantity() {
    let server = TestServer::spawn().await;
    add(&server, LASER_LEVEL, "2").await;

    let resp = server
        .htmx_post(
            "/cart/update",
            &[("product_id", LASER_LEVEL), ("quantity", "3")],
        )
        .await;
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");
    let items = resp.text().await.unwrap();
    assert!(items.contains("id=\"cart-items\""));
    assert!(items.contains("$149.97"));
    // The item count line is part of the swapped fragment
    assert!(items.contains("3 items in your cart"));

    let summary = server.page("/cart/summary").await;
    assert!(summary.contains("$149.97"));
}

#[tokio::test]
async fn test_form_update_below_one_keeps_line() {
    let server = TestServer::spawn().await;
    add(&server, LASER_LEVEL, "2").await;

    let items = server
        .htmx_post(
            "/cart/update",
            &[("product_id", LASER_LEVEL), ("quantity", "0")],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(items.contains("min=\"1\" value=\"1\""));
    assert!(!items.contains("Your cart is empty."));

    let badge = server.page("/cart/count").await;
    assert!(badge.contains(">1<"));
}

#[tokio::test]
async fn test_cleared_quantity_input_clamps_to_one() {
    let server = TestServer::spawn().await;
    add(&server, LASER_LEVEL, "2").await;

    let resp = server
        .htmx_post(
            "/cart/update",
            &[("product_id", LASER_LEVEL), ("quantity", "")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");
    let items = resp.text().await.unwrap();
    assert!(items.contains("min=\"1\" value=\"1\""));
    assert!(items.contains("1 item in your cart"));

    let badge = server.page("/cart/count").await;
    assert!(badge.contains(">1<"));
}

#[tokio::test]
async fn test_remove_last_line_empties_cart() {
    let server = TestServer::spawn().await;
    add(&server, LASER_LEVEL, "1").await;

    let resp = server
        .htmx_post("/cart/remove", &[("product_id", LASER_LEVEL)])
        .await;
    assert_eq!(resp.headers()["hx-trigger"], "cart-updated");
    let items = resp.text().await.unwrap();
    assert!(items.contains("Your cart is empty."));
    assert!(items.contains("0 items in your cart"));

    let badge = server.page("/cart/count").await;
    assert!(!badge.contains("class=\"cart-count"));

    let cart = server.page("/cart").await;
    assert!(cart.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_clear_cart() {
    let server = TestServer::spawn().await;
    add(&server, LASER_LEVEL, "2").await;
    add(&server, TAPE_MEASURE, "1").await;

    let resp = server.htmx_post("/cart/clear", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Your cart is empty."));

    let cart = api_cart(&server).await;
    assert_eq!(cart["count"], 0);
}

// ============================================================================
// Order Summary
// ============================================================================

#[tokio::test]
async fn test_summary_matches_pricing_rules() {
    let server = TestServer::spawn().await;
    add(&server, LASER_LEVEL, "3").await;
    add(&server, TAPE_MEASURE, "2").await;

    let cart = api_cart(&server).await;
    let subtotal: Price = serde_json::from_value(cart["summary"]["subtotal"].clone()).unwrap();
    let expected = OrderSummary::from_subtotal(subtotal);

    assert_eq!(subtotal, Price::from_cents(3 * 4999 + 2 * 2450));
    assert_eq!(
        serde_json::from_value::<OrderSummary>(cart["summary"].clone()).unwrap(),
        expected
    );

    let html = server.page("/cart/summary").await;
    assert!(html.contains(&expected.subtotal.display()));
    assert!(html.contains(&expected.discount.display()));
    assert!(html.contains(&expected.grand_total.display()));
}

#[tokio::test]
async fn test_plain_form_post_redirects() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .post(server.url("/cart/add"))
        .form(&[("product_id", LASER_LEVEL), ("return_to", "/products")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/products");

    let badge = server.page("/cart/count").await;
    assert!(badge.contains(">1<"));
}
