//! Toolshop Core - cart state and pricing.
//!
//! This crate holds the parts of the storefront cart that do not depend on
//! HTTP or templates:
//! - [`types`] - Newtype wrappers for product IDs and prices
//! - [`cart`] - The cart state, its store and change notifications
//! - [`pricing`] - Order summary derivation (discount, shipping, grand total)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no sessions,
//! no HTTP. The storefront binds one [`CartStore`] to each browsing session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartEvent, CartItem, CartObserver, CartStore, LineItem};
pub use pricing::OrderSummary;
pub use types::*;
