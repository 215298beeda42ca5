//! Cart JSON API.
//!
//! Unlike the HTML forms, `PUT /api/cart/lines/{product_id}` passes the
//! quantity to the store unclamped, so a quantity of 0 or less removes the
//! line.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use toolshop_core::{Cart, LineItem, OrderSummary, Price, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::Json as JsonBody;
use crate::middleware::CartSession;
use crate::state::AppState;

/// A cart line with its derived total.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    #[serde(flatten)]
    pub line: LineItem,
    pub line_total: Price,
}

/// Snapshot of the session cart.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub lines: Vec<LineResponse>,
    pub count: u32,
    pub summary: OrderSummary,
    pub revision: u64,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| LineResponse {
                    line: line.clone(),
                    line_total: line.line_total(),
                })
                .collect(),
            count: cart.count(),
            summary: cart.summary(),
            revision: cart.revision(),
        }
    }
}

/// Body for `POST /api/cart/lines`.
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Body for `PUT /api/cart/lines/{product_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub quantity: i64,
}

/// Get the session cart.
#[instrument(skip_all)]
pub async fn show(cart: CartSession) -> Json<CartResponse> {
    Json(CartResponse::from(cart.cart()))
}

/// Add a product to the cart. A quantity of 0 leaves the cart unchanged.
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state, cart))]
pub async fn add_line(
    State(state): State<AppState>,
    mut cart: CartSession,
    JsonBody(request): JsonBody<AddLineRequest>,
) -> Result<(StatusCode, Json<CartResponse>)> {
    let product = state
        .catalog()
        .get(request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let changed = cart
        .store_mut()
        .add_to_cart(product.cart_item(), request.quantity)
        .is_some();
    cart.save().await?;

    let status = if changed {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(CartResponse::from(cart.cart()))))
}

/// Set a line's quantity; 0 or less removes the line.
#[instrument(skip(cart))]
pub async fn update_line(
    Path(product_id): Path<ProductId>,
    mut cart: CartSession,
    JsonBody(request): JsonBody<UpdateLineRequest>,
) -> Result<Json<CartResponse>> {
    cart.store_mut()
        .update_quantity(product_id, request.quantity);
    cart.save().await?;
    Ok(Json(CartResponse::from(cart.cart())))
}

/// Remove a line. Removing an absent product is a no-op.
#[instrument(skip(cart))]
pub async fn remove_line(
    Path(product_id): Path<ProductId>,
    mut cart: CartSession,
) -> Result<Json<CartResponse>> {
    cart.store_mut().remove_from_cart(product_id);
    cart.save().await?;
    Ok(Json(CartResponse::from(cart.cart())))
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(mut cart: CartSession) -> Result<Json<CartResponse>> {
    cart.store_mut().clear_cart();
    cart.save().await?;
    Ok(Json(CartResponse::from(cart.cart())))
}
