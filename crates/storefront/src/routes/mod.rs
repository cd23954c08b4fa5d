//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (menu, cart modal closed)
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Home page with the cart modal open
//! GET  /cart/items             - Cart items fragment
//! GET  /cart/count             - Cart count badge fragment
//! POST /cart/add               - Add one unit (returns cart_items fragment)
//! POST /cart/increase          - Add one unit of a cart item (returns cart_items fragment)
//! POST /cart/decrease          - Take one unit away (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//!
//! # Checkout
//! GET  /checkout               - Redirect to the messaging link with the order
//! ```

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout redirect
        .route("/checkout", get(cart::checkout))
}
