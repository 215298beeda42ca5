//! Product catalog.
//!
//! The catalog supplies the product data that gets copied into cart lines.
//! It is loaded once at startup, either from a JSON file given by
//! `STOREFRONT_CATALOG_PATH` or from the built-in product list.
//!
//! # File Format
//!
//! ```json
//! [
//!   { "id": 1, "name": "Laser Level", "price": "49.99", "image": "images/laser-level.svg" }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use toolshop_core::{CartItem, Price, ProductId};

/// Built-in product list, used when no catalog path is configured.
const BUILTIN_CATALOG: &str = include_str!("../catalog/products.json");

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// A product offered by the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image path relative to the static root.
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// The data the cart needs to create a line for this product.
    #[must_use]
    pub fn cart_item(&self) -> CartItem {
        CartItem {
            product_id: self.id,
            name: self.name.clone(),
            unit_price: self.price,
            image: self.image.clone(),
        }
    }
}

/// Read-only product catalog, cheaply cloneable.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// Load the catalog from `path`, or the built-in list when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// lists the same product id twice.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let catalog = Self::from_json(&json)?;
                tracing::info!(
                    path = %path.display(),
                    products = catalog.len(),
                    "Loaded catalog"
                );
                Ok(catalog)
            }
            None => Self::builtin(),
        }
    }

    /// The built-in product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled JSON is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids are not unique.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// Build a catalog from products, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self {
            products: Arc::new(products),
        })
    }

    /// All products in listing order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());

        let laser = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(laser.name, "Laser Level");
        assert_eq!(laser.price, Price::from_cents(4999));

        let tape = catalog.get(ProductId::new(2)).unwrap();
        assert_eq!(tape.name, "Smart Tape Measure");
    }

    #[test]
    fn test_cart_item_copies_product_fields() {
        let catalog = Catalog::builtin().unwrap();
        let item = catalog.get(ProductId::new(1)).unwrap().cart_item();
        assert_eq!(item.product_id, ProductId::new(1));
        assert_eq!(item.name, "Laser Level");
        assert_eq!(item.unit_price, Price::from_cents(4999));
        assert_eq!(item.image, "images/laser-level.svg");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": 1, "name": "A", "price": "1.00", "image": "a.svg"},
            {"id": 1, "name": "B", "price": "2.00", "image": "b.svg"}
        ]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == ProductId::new(1)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Catalog::load(Some(Path::new("/nonexistent/catalog.json"))).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn test_unknown_product() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.get(ProductId::new(9999)).is_none());
    }
}
