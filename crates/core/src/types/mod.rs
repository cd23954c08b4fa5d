//! Core types for the Pastelería storefront.
//!
//! This module provides type-safe wrappers for prices and product names.

pub mod price;
pub mod product;

pub use price::{CURRENCY_SYMBOL, Price, PriceError};
pub use product::{Product, ProductName, ProductNameError};
