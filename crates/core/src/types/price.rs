//! Type-safe price representation using decimal arithmetic.
//!
//! All cart arithmetic is done on exact decimals. Rounding to cents only
//! happens when a price is displayed.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places shown for a price.
const DISPLAY_SCALE: u32 = 2;

/// Currency symbol prefixed to displayed prices.
const CURRENCY_SYMBOL: &str = "$";

/// A price in the store currency.
///
/// Serializes as a decimal string (e.g. `"49.99"`) to avoid float drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, DISPLAY_SCALE))
    }

    /// The exact, unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Price multiplied by a rate (e.g. `0.05` for five percent).
    #[must_use]
    pub fn scaled(self, rate: Decimal) -> Self {
        Self(self.0 * rate)
    }

    /// Amount rounded half away from zero to whole cents, with exactly two
    /// decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut value = self
            .0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(DISPLAY_SCALE);
        value
    }

    /// Format for display (e.g. `$19.99`).
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-{CURRENCY_SYMBOL}{}", rounded.abs())
        } else {
            write!(f, "{CURRENCY_SYMBOL}{}", rounded.abs())
        }
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
