//! Order summary pricing.
//!
//! Every figure is re-derived from the cart subtotal on each render:
//!
//! ```text
//! discount    = subtotal * 0.05
//! shipping    = 10.00
//! grand_total = subtotal - discount + shipping
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Discount rate applied to every order (five percent).
pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Flat shipping charge in cents, applied to every order including empty ones.
pub const SHIPPING_CENTS: i64 = 1000;

/// Derived totals shown in the order summary panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub discount: Price,
    pub shipping: Price,
    pub grand_total: Price,
}

impl OrderSummary {
    /// Derive the summary for a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Price) -> Self {
        let discount = subtotal.scaled(DISCOUNT_RATE);
        let shipping = Price::from_cents(SHIPPING_CENTS);
        let grand_total = subtotal - discount + shipping;

        Self {
            subtotal,
            discount,
            shipping,
            grand_total,
        }
    }

    /// Discount rate as a whole percentage, for labels like "Discount(5%)".
    #[must_use]
    pub fn discount_percent() -> Decimal {
        (DISCOUNT_RATE * Decimal::ONE_HUNDRED).normalize()
    }
}
