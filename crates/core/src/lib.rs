//! Pastelería Core - Shared types library.
//!
//! This crate provides the storefront's domain logic:
//! - [`types`] - Prices in soles, product names, catalog entries
//! - [`cart`] - The cart store and its render requests
//! - [`checkout`] - Order message and messaging deep link
//! - [`ui`] - Modal, menu, navbar and animation state shared with the page script
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no sessions,
//! no HTTP. The `storefront` crate renders from it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod types;
pub mod ui;

pub use cart::{Cart, CartError, CartSnapshot, CartStore, LineItem, RenderSink, SnapshotLine, SummaryLine};
pub use checkout::{CheckoutError, CheckoutLink, order_message};
pub use types::*;
