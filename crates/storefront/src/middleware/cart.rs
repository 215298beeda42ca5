//! Session cart extractor.
//!
//! Binds one [`CartStore`] to the browsing session. The cart is read from the
//! session when the extractor runs and written back by [`CartSession::save`]
//! only if it changed.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use toolshop_core::{Cart, CartStore};

use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;

/// The current session's cart.
///
/// Rejects with [`AppError::SessionUnavailable`] if the route is not behind
/// the session layer.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut cart: CartSession) -> Result<impl IntoResponse> {
///     cart.store_mut().clear_cart();
///     cart.save().await?;
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct CartSession {
    session: Session,
    store: CartStore,
    loaded_revision: u64,
}

impl CartSession {
    /// Load the cart for `session`, starting empty if none is stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: Session, state: &AppState) -> Result<Self, AppError> {
        let cart: Cart = session
            .get(session_keys::CART)
            .await?
            .unwrap_or_default();
        let loaded_revision = cart.revision();

        let mut store = CartStore::with_cart(cart);
        for observer in state.cart_observers() {
            store.subscribe(observer.clone());
        }

        Ok(Self {
            session,
            store,
            loaded_revision,
        })
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut CartStore {
        &mut self.store
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.store.cart()
    }

    /// Whether the cart changed since it was loaded.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.store.revision() != self.loaded_revision
    }

    /// Write the cart back to the session if it changed.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn save(&mut self) -> Result<bool, AppError> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.session
            .insert(session_keys::CART, self.store.cart())
            .await?;
        self.loaded_revision = self.store.revision();
        Ok(true)
    }
}

impl FromRequestParts<AppState> for CartSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::SessionUnavailable)?;

        Self::load(session, state).await
    }
}
