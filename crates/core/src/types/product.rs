//! Product names and catalog entries.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Errors that can occur when parsing a [`ProductName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductNameError {
    /// The input is empty or whitespace only.
    #[error("product name cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("product name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The name of a product.
///
/// The name is also the product's key in the cart: two line items with the
/// same name are the same product. Surrounding whitespace is trimmed.
///
/// ```
/// use pasteleria_core::ProductName;
///
/// let name = ProductName::parse("  Torta de Chocolate ").unwrap();
/// assert_eq!(name.as_str(), "Torta de Chocolate");
/// assert!(ProductName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Maximum length of a product name, in characters.
    pub const MAX_LENGTH: usize = 120;

    /// Parse a `ProductName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, ProductNameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductNameError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ProductNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductName {
    type Err = ProductNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductName {
    type Error = ProductNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductName> for String {
    fn from(name: ProductName) -> Self {
        name.0
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ProductName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A menu entry offered by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, also the cart key.
    pub name: ProductName,
    /// Unit price.
    pub price: Price,
    /// Short description shown on the menu card.
    #[serde(default)]
    pub description: String,
    /// Menu section, e.g. "Tortas" or "Postres".
    #[serde(default)]
    pub category: Option<String>,
    /// Path to the product image under `/static`.
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let name = ProductName::parse("\tCheesecake \n").unwrap();
        assert_eq!(name, "Cheesecake");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductName::parse(""), Err(ProductNameError::Empty));
        assert_eq!(ProductName::parse("  "), Err(ProductNameError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(ProductName::MAX_LENGTH + 1);
        assert!(matches!(
            ProductName::parse(&long),
            Err(ProductNameError::TooLong { .. })
        ));
        assert!(ProductName::parse(&"ñ".repeat(ProductName::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_names_are_case_sensitive_keys() {
        assert_ne!(
            ProductName::parse("Pie").unwrap(),
            ProductName::parse("pie").unwrap()
        );
    }

    #[test]
    fn test_product_deserializes_with_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"name": "Alfajor", "price": "3.50"}"#).unwrap();
        assert_eq!(product.name, "Alfajor");
        assert_eq!(product.price, Price::from_cents(350).unwrap());
        assert!(product.description.is_empty());
        assert!(product.image.is_none());
    }

    #[test]
    fn test_product_rejects_blank_name() {
        let result = serde_json::from_str::<Product>(r#"{"name": " ", "price": "3.50"}"#);
        assert!(result.is_err());
    }
}
