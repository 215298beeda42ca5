//! Cart route handlers.
//!
//! Cart actions use HTMX for in-place updates. Each mutating action saves
//! the session cart and, when something changed, fires the `cart-updated`
//! event so the header badge and the order summary re-fetch themselves.
//! Without HTMX the same forms post normally and get a redirect back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Deserialize;
use toolshop_core::{Cart, LineItem, OrderSummary, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::Form;
use crate::filters;
use crate::middleware::{CART_UPDATED_EVENT, CartSession, HX_TRIGGER_HEADER, HxRequest};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct LineView {
    /// 1-based row number.
    pub position: usize,
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<LineView>,
    pub count: u32,
}

/// Order summary display data for templates.
#[derive(Clone)]
pub struct SummaryView {
    pub subtotal: String,
    pub discount_label: String,
    pub discount: String,
    pub shipping: String,
    pub grand_total: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

/// URL for an image path relative to the static root.
pub(crate) fn static_url(path: &str) -> String {
    format!("/static/{}", path.trim_start_matches('/'))
}

impl LineView {
    fn new(position: usize, line: &LineItem) -> Self {
        Self {
            position,
            product_id: line.product_id,
            name: line.name.clone(),
            image_url: static_url(&line.image),
            unit_price: line.unit_price.display(),
            quantity: line.quantity,
            line_total: line.line_total().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .enumerate()
                .map(|(index, line)| LineView::new(index + 1, line))
                .collect(),
            count: cart.count(),
        }
    }
}

impl From<&OrderSummary> for SummaryView {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            subtotal: summary.subtotal.display(),
            discount_label: format!("Discount({}%)", OrderSummary::discount_percent()),
            discount: format!("-{}", summary.discount.display()),
            shipping: summary.shipping.display(),
            grand_total: summary.grand_total.display(),
        }
    }
}

/// Accept a redirect target only if it is a local absolute path.
fn local_path(candidate: Option<&str>, fallback: &str) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

/// Read a quantity as typed into a number input.
///
/// Blank or unparseable input reads as 0 and fractions are truncated, so the
/// caller's clamp decides what the row ends up with.
fn typed_quantity(raw: &str) -> i64 {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .and_then(|value| value.trunc().to_i64())
        .unwrap_or(0)
}

/// Wrap a fragment so HTMX fires `cart-updated` if the cart changed.
fn fragment(changed: bool, body: impl IntoResponse) -> Response {
    if changed {
        (
            AppendHeaders([(HX_TRIGGER_HEADER, CART_UPDATED_EVENT)]),
            body,
        )
            .into_response()
    } else {
        body.into_response()
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Raw stepper value; missing means 1.
    pub quantity: Option<String>,
    /// Page to return to for non-HTMX posts.
    pub return_to: Option<String>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    /// Raw input value; blank when the field was cleared.
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub summary: SummaryView,
    pub cart_count: u32,
}

/// Cart table fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u32,
}

/// Order summary fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_summary.html")]
pub struct OrderSummaryTemplate {
    pub summary: SummaryView,
}

impl CartItemsTemplate {
    fn new(cart: &Cart) -> Self {
        Self {
            cart: CartView::from(cart),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(cart: CartSession) -> impl IntoResponse {
    let cart = cart.cart();

    CartShowTemplate {
        cart: CartView::from(cart),
        summary: SummaryView::from(&cart.summary()),
        cart_count: cart.count(),
    }
}

/// Add item to cart.
///
/// Merges into an existing line for the same product. HTMX requests get the
/// updated count badge; plain posts are redirected to `return_to`.
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    mut cart: CartSession,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get(form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    // Without a stepper value a single item is added
    let quantity = form.quantity.as_deref().map_or(1, typed_quantity).max(1);
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    cart.store_mut().add_to_cart(product.cart_item(), quantity);
    let changed = cart.save().await?;

    if is_htmx {
        return Ok(fragment(
            changed,
            CartCountTemplate {
                cart_count: cart.store().cart_count(),
            },
        ));
    }
    Ok(Redirect::to(&local_path(form.return_to.as_deref(), "/products")).into_response())
}

/// Update cart item quantity.
///
/// The quantity input has `min="1"`; values below 1, blank input and
/// anything unparseable are clamped to 1 here so editing a row never removes
/// it. Removal goes through [`remove`].
#[instrument(skip(cart))]
pub async fn update(
    HxRequest(is_htmx): HxRequest,
    mut cart: CartSession,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let quantity = typed_quantity(&form.quantity).max(1);
    cart.store_mut().update_quantity(form.product_id, quantity);
    let changed = cart.save().await?;

    if is_htmx {
        return Ok(fragment(changed, CartItemsTemplate::new(cart.cart())));
    }
    Ok(Redirect::to("/cart").into_response())
}

/// Remove item from cart. Removing a product that is not in the cart is a no-op.
#[instrument(skip(cart))]
pub async fn remove(
    HxRequest(is_htmx): HxRequest,
    mut cart: CartSession,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    cart.store_mut().remove_from_cart(form.product_id);
    let changed = cart.save().await?;

    if is_htmx {
        return Ok(fragment(changed, CartItemsTemplate::new(cart.cart())));
    }
    Ok(Redirect::to("/cart").into_response())
}

/// Empty the cart.
#[instrument(skip(cart))]
pub async fn clear(HxRequest(is_htmx): HxRequest, mut cart: CartSession) -> Result<Response> {
    cart.store_mut().clear_cart();
    let changed = cart.save().await?;

    if is_htmx {
        return Ok(fragment(changed, CartItemsTemplate::new(cart.cart())));
    }
    Ok(Redirect::to("/cart").into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(cart: CartSession) -> impl IntoResponse {
    CartCountTemplate {
        cart_count: cart.store().cart_count(),
    }
}

/// Get order summary panel (HTMX).
#[instrument(skip_all)]
pub async fn summary(cart: CartSession) -> impl IntoResponse {
    OrderSummaryTemplate {
        summary: SummaryView::from(&cart.cart().summary()),
    }
}
