//! Cart state and the store that owns it.
//!
//! [`Cart`] is the plain, serializable state: an ordered list of line items
//! keyed by [`ProductId`]. Its mutators are total functions that return the
//! [`CartEvent`] describing what changed, or `None` when the call was a no-op.
//!
//! [`CartStore`] wraps one cart for the lifetime of a browsing session and
//! notifies subscribed [`CartObserver`]s after every effective change.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pricing::OrderSummary;
use crate::types::{Price, ProductId};

/// Product data supplied by the catalog when adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    /// Image path relative to the static root.
    pub image: String,
}

/// One product-quantity pairing in the cart.
///
/// `quantity` is always at least 1. A line whose quantity would drop to 0 is
/// removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image: String,
    pub quantity: u32,
}

impl LineItem {
    fn new(item: CartItem, quantity: u32) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            unit_price: item.unit_price,
            image: item.image,
            quantity,
        }
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A change applied to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// `quantity` units were added, either as a new line or onto an existing one.
    Added { product_id: ProductId, quantity: u32 },
    /// The line was removed.
    Removed { product_id: ProductId },
    /// The line's quantity was set to `quantity`.
    QuantityChanged { product_id: ProductId, quantity: u32 },
    /// Every line was removed.
    Cleared,
}

impl CartEvent {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Added { .. } => "added",
            Self::Removed { .. } => "removed",
            Self::QuantityChanged { .. } => "quantity_changed",
            Self::Cleared => "cleared",
        }
    }

    /// Product the event applies to, if any.
    #[must_use]
    pub const fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::Added { product_id, .. }
            | Self::Removed { product_id }
            | Self::QuantityChanged { product_id, .. } => Some(*product_id),
            Self::Cleared => None,
        }
    }
}

/// Ordered collection of line items, insertion order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<LineItem>,
    /// Count of effective changes since the cart was created.
    #[serde(default)]
    revision: u64,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            revision: 0,
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Sum of `unit_price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    /// Derived order summary for the current subtotal.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_subtotal(self.subtotal())
    }

    /// Add `quantity` of `item`, merging into an existing line for the same
    /// product.
    ///
    /// Adding zero units is a no-op.
    pub fn add(&mut self, item: CartItem, quantity: u32) -> Option<CartEvent> {
        if quantity == 0 {
            return None;
        }

        let product_id = item.product_id;
        match self.lines.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(LineItem::new(item, quantity)),
        }

        Some(self.changed(CartEvent::Added {
            product_id,
            quantity,
        }))
    }

    /// Remove the line for `product_id` if present.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartEvent> {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        if self.lines.len() == before {
            return None;
        }
        Some(self.changed(CartEvent::Removed { product_id }))
    }

    /// Set the quantity for `product_id`. A quantity of zero or less removes
    /// the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Option<CartEvent> {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)?;
        if line.quantity == quantity {
            return None;
        }
        line.quantity = quantity;

        Some(self.changed(CartEvent::QuantityChanged {
            product_id,
            quantity,
        }))
    }

    /// Remove every line.
    pub fn clear(&mut self) -> Option<CartEvent> {
        if self.lines.is_empty() {
            return None;
        }
        self.lines.clear();
        Some(self.changed(CartEvent::Cleared))
    }

    const fn changed(&mut self, event: CartEvent) -> CartEvent {
        self.revision += 1;
        event
    }
}

/// Receives a notification after each effective cart change.
pub trait CartObserver: Send + Sync {
    /// Called with the change and the cart state after it was applied.
    fn on_change(&self, event: &CartEvent, cart: &Cart);
}

impl<F> CartObserver for F
where
    F: Fn(&CartEvent, &Cart) + Send + Sync,
{
    fn on_change(&self, event: &CartEvent, cart: &Cart) {
        self(event, cart);
    }
}

/// Owner of one session's cart.
///
/// All mutation goes through the store so that subscribers see every change.
/// No-op calls (removing an absent product, clearing an empty cart) do not
/// notify.
#[derive(Default)]
pub struct CartStore {
    cart: Cart,
    observers: Vec<Arc<dyn CartObserver>>,
}

impl CartStore {
    /// Create a store over an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over an existing cart, e.g. one loaded from a session.
    #[must_use]
    pub fn with_cart(cart: Cart) -> Self {
        Self {
            cart,
            observers: Vec::new(),
        }
    }

    /// Register an observer for subsequent changes.
    pub fn subscribe(&mut self, observer: Arc<dyn CartObserver>) {
        self.observers.push(observer);
    }

    /// Current cart state.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Consume the store, returning the cart state.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.cart.revision()
    }

    pub fn add_to_cart(&mut self, item: CartItem, quantity: u32) -> Option<CartEvent> {
        let event = self.cart.add(item, quantity);
        self.notify(event)
    }

    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Option<CartEvent> {
        let event = self.cart.remove(product_id);
        self.notify(event)
    }

    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Option<CartEvent> {
        let event = self.cart.update_quantity(product_id, quantity);
        self.notify(event)
    }

    pub fn clear_cart(&mut self) -> Option<CartEvent> {
        let event = self.cart.clear();
        self.notify(event)
    }

    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.cart.count()
    }

    #[must_use]
    pub fn cart_subtotal(&self) -> Price {
        self.cart.subtotal()
    }

    fn notify(&self, event: Option<CartEvent>) -> Option<CartEvent> {
        if let Some(event) = &event {
            for observer in &self.observers {
                observer.on_change(event, &self.cart);
            }
        }
        event
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish()
    }
}
