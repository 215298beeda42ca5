//! HTMX request detection.
//!
//! Cart actions answer HTMX requests with HTML fragments and plain form
//! posts with a redirect, so every action also works without JavaScript.

use axum::{extract::FromRequestParts, http::request::Parts};

/// Header HTMX sets on every request it issues.
pub const HX_REQUEST_HEADER: &str = "hx-request";

/// Response header used to fire client-side events.
pub const HX_TRIGGER_HEADER: &str = "HX-Trigger";

/// Event fired after any cart change. Fragments that display cart state
/// listen for it with `hx-trigger="cart-updated from:body"`.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Whether the request was issued by HTMX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get(HX_REQUEST_HEADER)
            .is_some_and(|value| value.as_bytes() == b"true");
        Ok(Self(is_htmx))
    }
}
