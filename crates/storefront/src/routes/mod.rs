//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                         - Redirect to /products
//! GET    /health                   - Health check
//!
//! # Products
//! GET    /products                 - Product listing with add-to-cart forms
//!
//! # Cart (HTML, HTMX fragments when HX-Request is set)
//! GET    /cart                     - Cart page
//! POST   /cart/add                 - Add to cart (returns count badge, triggers cart-updated)
//! POST   /cart/update              - Update quantity, clamped to >= 1 (returns cart_items fragment)
//! POST   /cart/remove              - Remove item (returns cart_items fragment)
//! POST   /cart/clear               - Empty the cart (returns cart_items fragment)
//! GET    /cart/count               - Cart count badge (fragment)
//! GET    /cart/summary             - Order summary panel (fragment)
//!
//! # Cart JSON API
//! GET    /api/cart                 - Cart snapshot
//! DELETE /api/cart                 - Empty the cart
//! POST   /api/cart/lines           - Add a product
//! PUT    /api/cart/lines/{id}      - Set quantity (<= 0 removes)
//! DELETE /api/cart/lines/{id}      - Remove a product
//! ```

pub mod api;
pub mod cart;
pub mod products;

use axum::{
    Router,
    extract::Request,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::{
    create_session_layer, csp_nonce_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::index))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .route("/summary", get(cart::summary))
}

/// Create the cart API routes router.
pub fn cart_api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api::cart::show).delete(api::cart::clear))
        .route("/lines", post(api::cart::add_line))
        .route(
            "/lines/{product_id}",
            put(api::cart::update_line).delete(api::cart::remove_line),
        )
}

/// Create all page and API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/api/cart", cart_api_routes())
}

/// Build the complete storefront application.
///
/// Includes the health check, static files, sessions and the middleware
/// stack. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let static_files = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", static_files)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(csp_nonce_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
