//! Session-related types.
//!
//! Each visitor's cart lives in their session and nowhere else. The session
//! store is in memory, so a restart empties every cart.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's cart (`pasteleria_core::Cart`).
    pub const CART: &str = "cart";
}
