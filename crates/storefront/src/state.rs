//! Application state shared across handlers.

use std::sync::Arc;

use pasteleria_core::CheckoutLink;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds only read-only data.
/// Carts are not here; each one lives in its visitor's session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkout: CheckoutLink,
}

impl AppState {
    /// Create a new application state, loading the catalog named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::bundled()?,
        };
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create a new application state with an already loaded catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let checkout = config.checkout.link();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout,
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

    /// Get a reference to the checkout link builder.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutLink {
        &self.inner.checkout
    }
}
