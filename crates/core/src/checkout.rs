//! Checkout handoff to a messaging deep link.
//!
//! Checkout does not process orders. It turns the cart into a plain-text
//! order summary and embeds it, percent-encoded, in a messaging link the
//! customer opens in a new tab.

use crate::cart::Cart;

/// Greeting that opens every order message.
pub const GREETING: &str = "¡Hola! Me gustaría hacer el siguiente pedido:";

/// Notice shown when checkout is attempted with nothing in the cart.
pub const EMPTY_CART_NOTICE: &str = "Tu carrito está vacío";

/// Default messaging link the order is handed to.
pub const DEFAULT_BASE_URL: &str = "https://wa.link/tbdv8t";

/// Default query parameter carrying the order text.
pub const DEFAULT_TEXT_PARAM: &str = "text";

/// Errors that abort a checkout.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no items.
    #[error("{EMPTY_CART_NOTICE}")]
    EmptyCart,
}

/// Build the order message for a cart.
///
/// ```text
/// ¡Hola! Me gustaría hacer el siguiente pedido:
///
/// • Cake x2 - S/ 50.00
///
/// *Total: S/ 50.00*
/// ```
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no items.
pub fn order_message(cart: &Cart) -> Result<String, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut message = format!("{GREETING}\n\n");
    for line in cart.summary_lines() {
        message.push_str(&line.to_string());
        message.push('\n');
    }
    message.push_str(&format!("\n*Total: {}*", cart.total_price()));
    Ok(message)
}

/// Where and how the order message is handed off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLink {
    base_url: String,
    text_param: String,
}

impl Default for CheckoutLink {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TEXT_PARAM)
    }
}

impl CheckoutLink {
    /// Create a link builder for a messaging service.
    #[must_use]
    pub fn new(base_url: impl Into<String>, text_param: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            text_param: text_param.into(),
        }
    }

    /// The messaging service URL without the order text.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query parameter name that carries the order text.
    #[must_use]
    pub fn text_param(&self) -> &str {
        &self.text_param
    }

    /// Build `<base_url>?<text_param>=<percent-encoded message>`.
    ///
    /// Appends with `&` when the base URL already has a query string.
    #[must_use]
    pub fn link_for_message(&self, message: &str) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}{}={}",
            self.base_url,
            urlencoding::encode(&self.text_param),
            urlencoding::encode(message)
        )
    }

    /// Build the deep link for a cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no items; no link
    /// is produced in that case.
    pub fn link_for(&self, cart: &Cart) -> Result<String, CheckoutError> {
        let message = order_message(cart)?;
        tracing::info!(
            items = cart.items().len(),
            total = %cart.total_price(),
            "checkout link built"
        );
        Ok(self.link_for_message(&message))
    }
}
