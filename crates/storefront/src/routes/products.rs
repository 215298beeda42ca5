//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use toolshop_core::ProductId;
use tracing::instrument;

use crate::catalog::Product;
use crate::filters;
use crate::middleware::{CartSession, CspNonce};
use crate::routes::cart::static_url;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.display(),
            image_url: static_url(&product.image),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub cart_count: u32,
    pub nonce: String,
}

/// Display product listing page.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    cart: CartSession,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let products = state
        .catalog()
        .products()
        .iter()
        .map(ProductView::from)
        .collect();

    ProductsIndexTemplate {
        products,
        cart_count: cart.store().cart_count(),
        nonce,
    }
}
