//! Session-related types.
//!
//! The cart lives in the session; nothing about it is persisted beyond the
//! session store's lifetime.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the serialized `toolshop_core::Cart`.
    pub const CART: &str = "cart";
}
