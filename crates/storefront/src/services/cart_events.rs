//! Cart change observers.
//!
//! Every cart loaded for a request is subscribed to these observers, so each
//! effective change is logged and leaves a Sentry breadcrumb.

use std::sync::Arc;

use toolshop_core::{Cart, CartEvent, CartObserver};

use crate::error::add_breadcrumb;

/// Logs each cart change as a debug event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CartObserver for TracingObserver {
    fn on_change(&self, event: &CartEvent, cart: &Cart) {
        tracing::debug!(
            event = event.name(),
            product_id = event.product_id().map(|id| id.as_i32()),
            lines = cart.len(),
            count = cart.count(),
            subtotal = %cart.subtotal(),
            revision = cart.revision(),
            "Cart changed"
        );
    }
}

/// Records each cart change as a Sentry breadcrumb.
#[derive(Debug, Default, Clone, Copy)]
pub struct BreadcrumbObserver;

impl CartObserver for BreadcrumbObserver {
    fn on_change(&self, event: &CartEvent, cart: &Cart) {
        let count = cart.count().to_string();
        match event.product_id() {
            Some(product_id) => {
                let product_id = product_id.to_string();
                add_breadcrumb(
                    "cart",
                    event.name(),
                    Some(&[("product_id", &product_id), ("count", &count)]),
                );
            }
            None => add_breadcrumb("cart", event.name(), Some(&[("count", &count)])),
        }
    }
}

/// Observers attached to every session cart.
#[must_use]
pub fn default_observers() -> Vec<Arc<dyn CartObserver>> {
    vec![Arc::new(TracingObserver), Arc::new(BreadcrumbObserver)]
}
