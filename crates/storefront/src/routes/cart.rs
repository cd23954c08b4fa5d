//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart is kept in the visitor's session. Each request loads it, runs a
//! single cart store operation to completion, and writes it back when the
//! store asked for a re-render. The re-render is the response: the full
//! cart items fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use pasteleria_core::ui::CartModal;
use pasteleria_core::{Cart, CartSnapshot, CartStore, ProductName, RenderSink};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::routes::home::{self, HomeTemplate};
use crate::state::AppState;

/// HTMX event fired after the cart changes, so the count badge refreshes.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Returns `true` if there are no items to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            items: snapshot
                .lines
                .iter()
                .map(|line| CartItemView {
                    name: line.name.to_string(),
                    quantity: line.quantity,
                    price: line.unit_price.to_string(),
                    line_price: line.subtotal.to_string(),
                })
                .collect(),
            total: snapshot.total.to_string(),
            item_count: snapshot.item_count,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self::from(&cart.snapshot())
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Render sink that keeps the latest snapshot for the response.
#[derive(Debug, Default)]
struct FragmentSink {
    latest: Option<CartSnapshot>,
}

impl RenderSink for FragmentSink {
    fn render(&mut self, snapshot: &CartSnapshot) {
        self.latest = Some(snapshot.clone());
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the visitor's cart from the session, or an empty one.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Discarding unreadable cart from session: {e}");
            Cart::default()
        }
    }
}

/// Store the visitor's cart in the session.
async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Run one cart store operation against the session cart.
///
/// When the store emits a render, the cart is saved and the rendered fragment
/// is returned with an `HX-Trigger` header. Otherwise nothing is saved and
/// the unchanged fragment is returned without the trigger.
async fn apply<F>(session: &Session, operation: F) -> Result<Response>
where
    F: FnOnce(&mut CartStore<FragmentSink>) + Send,
{
    let cart = load_cart(session).await;
    let mut store = CartStore::with_cart(cart, FragmentSink::default());
    operation(&mut store);
    let (cart, sink) = store.into_parts();

    let Some(snapshot) = sink.latest else {
        return Ok(CartItemsTemplate {
            cart: CartView::from(&cart),
        }
        .into_response());
    };

    save_cart(session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartItemsTemplate {
            cart: CartView::from(&snapshot),
        },
    )
        .into_response())
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Form data naming one product.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub name: String,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the storefront with the cart modal open.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> HomeTemplate {
    let cart = load_cart(&session).await;
    let mut modal = CartModal::default();
    modal.open();
    home::render_page(&state, &cart, modal)
}

/// Cart items fragment (HTMX).
#[instrument(skip(session))]
pub async fn items(session: Session) -> CartItemsTemplate {
    let cart = load_cart(&session).await;
    CartItemsTemplate {
        cart: CartView::from(&cart),
    }
}

/// Cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    CartCountTemplate {
        count: load_cart(&session).await.item_count(),
    }
}

/// Add one unit of a catalog product (HTMX).
///
/// The price comes from the catalog. A product already in the cart keeps the
/// price it was first added with.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let name = ProductName::parse(&form.name)?;
    let price = state
        .catalog()
        .find(name.as_str())
        .map(|product| product.price)
        .ok_or_else(|| AppError::NotFound(format!("product '{name}'")))?;

    add_breadcrumb("cart", "Added product", Some(&[("product", name.as_str())]));

    apply(&session, move |store| {
        store.add(name, price);
    })
    .await
}

/// Add one unit of a product already in the cart (HTMX).
#[instrument(skip(session))]
pub async fn increase(session: Session, Form(form): Form<ItemForm>) -> Result<Response> {
    apply(&session, move |store| {
        store.increase(&form.name);
    })
    .await
}

/// Take one unit away, never below one (HTMX).
#[instrument(skip(session))]
pub async fn decrease(session: Session, Form(form): Form<ItemForm>) -> Result<Response> {
    apply(&session, move |store| {
        store.decrease(&form.name);
    })
    .await
}

/// Remove a product from the cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<ItemForm>) -> Result<Response> {
    apply(&session, move |store| {
        store.remove(&form.name);
    })
    .await
}

/// Redirect to the messaging link carrying the order summary.
///
/// An empty cart is refused with a notice and no redirect.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let cart = load_cart(&session).await;
    let link = state.checkout().link_for(&cart).inspect_err(|e| {
        tracing::info!("Checkout refused: {e}");
    })?;

    let items = cart.items().len().to_string();
    add_breadcrumb("checkout", "Opened messaging checkout", Some(&[("items", &items)]));

    Ok(Redirect::to(&link))
}
