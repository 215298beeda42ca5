//! Application state shared across handlers.

use std::sync::Arc;

use toolshop_core::CartObserver;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::services::default_observers;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the product catalog and the cart observers. It holds no
/// cart data; each cart belongs to its session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart_observers: Vec<Arc<dyn CartObserver>>,
}

impl AppState {
    /// Create a new application state, loading the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create application state around an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart_observers: default_observers(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Observers subscribed to every session cart.
    #[must_use]
    pub fn cart_observers(&self) -> &[Arc<dyn CartObserver>] {
        &self.inner.cart_observers
    }
}
