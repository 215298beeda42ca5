//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! Each test builds the full application, including the session layer and
//! the security middleware, and replays the session cookie by hand.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use toolshop_storefront::config::StorefrontConfig;
use toolshop_storefront::{AppState, app};

fn test_app() -> Router {
    let config = StorefrontConfig {
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
        ..StorefrontConfig::default()
    };
    app(AppState::new(config).unwrap())
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// The `name=value` part of the session cookie, if one was set.
fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn form(uri: &str, body: &str, cookie: Option<&str>, htmx: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if htmx {
        builder = builder.header("HX-Request", "true");
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = test_app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_root_redirects_to_products() {
    let response = test_app().oneshot(get("/", None)).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/products");
}

#[tokio::test]
async fn test_products_page_lists_catalog() {
    let response = test_app().oneshot(get("/products", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let csp = response.headers()[header::CONTENT_SECURITY_POLICY]
        .to_str()
        .unwrap()
        .to_string();
    assert!(csp.contains("'nonce-"));
    assert!(response.headers().contains_key("x-request-id"));

    let html = body_text(response).await;
    assert!(html.contains("Laser Level"));
    assert!(html.contains("$49.99"));
    assert!(html.contains("Stud Finder"));
    assert!(html.contains("id=\"cart-badge\""));
    // Steppers start at zero
    assert!(html.contains("id=\"qty-1\" name=\"quantity\" min=\"0\" value=\"0\""));
    assert!(html.contains("data-quantity=\"qty-1\""));
    assert!(!html.contains("class=\"cart-count"));
}

#[tokio::test]
async fn test_empty_cart_page() {
    let response = test_app().oneshot(get("/cart", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    // Reading an empty cart does not start a session
    assert!(session_cookie(&response).is_none());

    let html = body_text(response).await;
    assert!(html.contains("Your cart is empty."));
    assert!(html.contains("Order Summary"));
    assert!(html.contains("$10.00"));
    assert!(html.contains("0 items in your cart"));
    // The cart page carries no inline script
    assert!(!html.contains("nonce="));
}

#[tokio::test]
async fn test_htmx_add_returns_badge_and_trigger() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form("/cart/add", "product_id=1&quantity=2", None, true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["hx-trigger"], "cart-updated");
    let cookie = session_cookie(&response).unwrap();

    let badge = body_text(response).await;
    assert!(badge.contains("class=\"cart-count"));
    assert!(badge.contains(">2<"));

    let response = app
        .clone()
        .oneshot(get("/cart", Some(&cookie)))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("Laser Level"));
    assert!(html.contains("$99.98"));
    assert!(html.contains("-$5.00"));
    assert!(html.contains("$104.98"));

    let response = app
        .oneshot(get("/cart/summary", Some(&cookie)))
        .await
        .unwrap();
    let summary = body_text(response).await;
    assert!(summary.contains("$104.98"));
}

#[tokio::test]
async fn test_plain_add_redirects_back() {
    let response = test_app()
        .oneshot(form(
            "/cart/add",
            "product_id=2&return_to=%2Fproducts",
            None,
            false,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/products");
    assert!(session_cookie(&response).is_some());
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let response = test_app()
        .oneshot(form("/cart/add", "product_id=999", None, true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_missing_line_does_not_trigger() {
    let response = test_app()
        .oneshot(form("/cart/remove", "product_id=1", None, true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("hx-trigger"));
    assert!(body_text(response).await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_api_quantity_zero_removes_line() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/cart/lines",
            &json!({"product_id": 3, "quantity": 2}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response).unwrap();

    let cart = body_json(response).await;
    assert_eq!(cart["count"], 2);
    assert_eq!(cart["lines"][0]["line_total"], "178.00");

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/cart/lines/3",
            &json!({"quantity": 0}),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cart = body_json(response).await;
    assert_eq!(cart["count"], 0);
    assert_eq!(cart["lines"].as_array().unwrap().len(), 0);
    assert_eq!(cart["summary"]["grand_total"], "10.00");
}

#[tokio::test]
async fn test_api_unknown_product_is_not_found() {
    let response = test_app()
        .oneshot(json_request(
            Method::POST,
            "/api/cart/lines",
            &json!({"product_id": 42}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let response = test_app()
        .oneshot(get("/static/css/main.css", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_form_quantity_is_clamped_not_rejected() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form("/cart/add", "product_id=1&quantity=2", None, true))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    for quantity in ["", "2.5", "many", "-3"] {
        let response = app
            .clone()
            .oneshot(form(
                "/cart/update",
                &format!("product_id=1&quantity={quantity}"),
                Some(&cookie),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "quantity={quantity:?}");
        let expected = if quantity == "2.5" { "value=\"2\"" } else { "value=\"1\"" };
        assert!(body_text(response).await.contains(&format!("min=\"1\" {expected}")));
    }

    let response = app
        .oneshot(get("/cart/count", Some(&cookie)))
        .await
        .unwrap();
    assert!(body_text(response).await.contains(">1<"));
}

#[tokio::test]
async fn test_malformed_input_is_bad_request() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form("/cart/update", "product_id=drill&quantity=1", None, true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/cart/lines/1",
            &json!({"quantity": "lots"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
