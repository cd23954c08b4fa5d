//! Product catalog for the menu section.
//!
//! The catalog is loaded once at startup and held in memory. It is either the
//! menu bundled with the binary (`content/catalog.json`) or a JSON file named
//! by `STOREFRONT_CATALOG_PATH` with the same shape.
//!
//! Cart prices always come from here, never from the request.

use std::path::Path;
use std::sync::Arc;

use pasteleria_core::{Product, ProductName};

/// Menu bundled with the binary.
const BUNDLED_CATALOG: &str = include_str!("../content/catalog.json");

/// Section title for products without a category.
const UNCATEGORIZED: &str = "Otros";

/// Errors loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product in catalog: {0}")]
    DuplicateProduct(ProductName),
    #[error("catalog has no products")]
    Empty,
}

/// A titled group of products on the menu.
#[derive(Debug, Clone)]
pub struct MenuSection<'a> {
    pub title: &'a str,
    pub products: Vec<&'a Product>,
}

/// The products offered by the storefront.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// Load the bundled menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled JSON is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load a menu from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.products.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a menu from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, empty, or names a product twice.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns an error if `products` is empty or names a product twice.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, product) in products.iter().enumerate() {
            if products
                .iter()
                .skip(index + 1)
                .any(|other| other.name == product.name)
            {
                return Err(CatalogError::DuplicateProduct(product.name.clone()));
            }
        }
        Ok(Self {
            products: Arc::new(products),
        })
    }

    /// All products in menu order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Find a product by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.name == name)
    }

    /// Products grouped by category, in order of first appearance.
    #[must_use]
    pub fn sections(&self) -> Vec<MenuSection<'_>> {
        let mut sections: Vec<MenuSection<'_>> = Vec::new();
        for product in self.products.iter() {
            let title = product.category.as_deref().unwrap_or(UNCATEGORIZED);
            match sections.iter_mut().find(|section| section.title == title) {
                Some(section) => section.products.push(product),
                None => sections.push(MenuSection {
                    title,
                    products: vec![product],
                }),
            }
        }
        sections
    }
}
