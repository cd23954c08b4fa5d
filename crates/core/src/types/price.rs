//! Type-safe price representation using decimal arithmetic.
//!
//! Every amount in the storefront is in Peruvian soles and is shown with the
//! fixed `S/` prefix. There is no currency negotiation.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency prefix used for every rendered amount.
pub const CURRENCY_SYMBOL: &str = "S/";

/// Number of decimal places shown to customers.
const DISPLAY_DECIMALS: u32 = 2;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative amount in soles.
///
/// ## Examples
///
/// ```
/// use pasteleria_core::Price;
///
/// let cake = Price::from_cents(2500).unwrap();
/// assert_eq!(cake.to_string(), "S/ 25.00");
/// assert_eq!((cake * 2).to_string(), "S/ 50.00");
/// assert!("-1".parse::<Price>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount.normalize()))
    }

    /// Create a price from a whole number of céntimos.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The exact amount, without rounding.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded half away from zero to two decimals.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
    }

    /// The amount fixed to two decimals, without the currency prefix.
    ///
    /// ```
    /// use pasteleria_core::Price;
    ///
    /// assert_eq!(Price::from_cents(1050).unwrap().fixed(), "10.50");
    /// ```
    #[must_use]
    pub fn fixed(&self) -> String {
        format!("{:.2}", self.rounded())
    }

    /// Multiply by a quantity, saturating instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Returns `true` for a zero amount.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL} {}", self.fixed())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        self.times(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_soles_prefix() {
        assert_eq!(Price::from_cents(2500).unwrap().to_string(), "S/ 25.00");
        assert_eq!(Price::ZERO.to_string(), "S/ 0.00");
    }

    #[test]
    fn test_display_pads_and_rounds() {
        assert_eq!("7.5".parse::<Price>().unwrap().to_string(), "S/ 7.50");
        assert_eq!("2.675".parse::<Price>().unwrap().to_string(), "S/ 2.68");
        assert_eq!("2.674".parse::<Price>().unwrap().to_string(), "S/ 2.67");
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Price::from_cents(-1),
            Err(PriceError::Negative(_))
        ));
        assert!(matches!("-3.00".parse::<Price>(), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_negative_zero_allowed() {
        assert!("-0".parse::<Price>().unwrap().is_zero());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert!(matches!("".parse::<Price>(), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(" 12.5 ".parse::<Price>().unwrap(), Price::from_cents(1250).unwrap());
    }

    #[test]
    fn test_times_and_sum() {
        let pie = Price::from_cents(1500).unwrap();
        let cake = Price::from_cents(1000).unwrap();
        assert_eq!(pie * 3, Price::from_cents(4500).unwrap());
        assert_eq!([pie, cake].iter().sum::<Price>(), Price::from_cents(2500).unwrap());
        assert_eq!(Vec::<Price>::new().into_iter().sum::<Price>(), Price::ZERO);
    }

    #[test]
    fn test_equality_ignores_trailing_zeros() {
        assert_eq!("25".parse::<Price>().unwrap(), "25.00".parse::<Price>().unwrap());
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let price = Price::from_cents(1990).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.9\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_serde_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-5\"").is_err());
    }
}
