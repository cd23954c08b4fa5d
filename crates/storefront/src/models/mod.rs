//! Domain models for storefront.
//!
//! The cart itself is [`pasteleria_core::Cart`]; this module only names the
//! places it is kept.

pub mod session;

pub use session::keys as session_keys;
