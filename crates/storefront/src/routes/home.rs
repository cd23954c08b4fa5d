//! Home page route handler.
//!
//! The storefront is a single page: hero, menu, about and contact sections,
//! with the cart in a modal. The initial modal, scroll lock and in-page link
//! targets are rendered here; `static/js/storefront.js` animates the rest,
//! reading its thresholds and labels from `data-*` attributes.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use pasteleria_core::ui::{
    ACTIVE_CLASS, AddButtonFeedback, CART_ICON_ID, CHECKOUT_BUTTON_ID, CartModal, FADE_IN_CLASS,
    FadeInOptions, NAVBAR_SCROLL_THRESHOLD, SCROLL_LOCKED_CLASS, SCROLLED_CLASS, VISIBLE_CLASS,
    resolve_anchor,
};
use pasteleria_core::{Cart, Product};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::MenuSection;
use crate::filters;
use crate::routes::cart::{CartView, load_cart};
use crate::state::AppState;

/// Page behavior parameters handed to the browser script.
#[derive(Clone)]
pub struct PageEffects {
    pub navbar_threshold: f64,
    pub scrolled_class: &'static str,
    pub fade_in_class: &'static str,
    pub fade_threshold: f64,
    pub fade_root_margin: &'static str,
    pub visible_class: &'static str,
    pub active_class: &'static str,
    pub scroll_locked_class: &'static str,
    pub cart_icon_id: &'static str,
    pub checkout_button_id: &'static str,
    pub add_label: &'static str,
    pub added_label: &'static str,
    pub added_ms: u128,
}

impl Default for PageEffects {
    fn default() -> Self {
        let fade = FadeInOptions::STANDARD;
        Self {
            navbar_threshold: NAVBAR_SCROLL_THRESHOLD,
            scrolled_class: SCROLLED_CLASS,
            fade_in_class: FADE_IN_CLASS,
            fade_threshold: fade.threshold,
            fade_root_margin: fade.root_margin,
            visible_class: VISIBLE_CLASS,
            active_class: ACTIVE_CLASS,
            scroll_locked_class: SCROLL_LOCKED_CLASS,
            cart_icon_id: CART_ICON_ID,
            checkout_button_id: CHECKOUT_BUTTON_ID,
            add_label: AddButtonFeedback::Idle.label(),
            added_label: AddButtonFeedback::Added.label(),
            added_ms: AddButtonFeedback::CONFIRMATION.as_millis(),
        }
    }
}

/// Sections linked from the navbar, in order.
const NAV_SECTIONS: [(&str, &str); 4] = [
    ("#inicio", "Inicio"),
    ("#menu", "Menú"),
    ("#nosotros", "Nosotros"),
    ("#contacto", "Contacto"),
];

/// An in-page link and the element it scrolls to, if any.
#[derive(Clone)]
pub struct NavLinkView {
    pub href: &'static str,
    pub label: &'static str,
    pub scroll_to: Option<String>,
}

impl NavLinkView {
    fn new(href: &'static str, label: &'static str) -> Self {
        Self {
            href,
            label,
            scroll_to: resolve_anchor(href, None).target().map(str::to_owned),
        }
    }
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.to_string(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
        }
    }
}

/// Menu section display data for templates.
#[derive(Clone)]
pub struct MenuSectionView {
    pub title: String,
    pub products: Vec<ProductCardView>,
}

impl From<&MenuSection<'_>> for MenuSectionView {
    fn from(section: &MenuSection<'_>) -> Self {
        Self {
            title: section.title.to_string(),
            products: section
                .products
                .iter()
                .map(|product| ProductCardView::from(*product))
                .collect(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav_links: Vec<NavLinkView>,
    pub hero_link: NavLinkView,
    pub sections: Vec<MenuSectionView>,
    pub cart: CartView,
    pub count: u64,
    pub modal: CartModal,
    pub effects: PageEffects,
}

/// Build the page for a cart and an initial modal state.
#[must_use]
pub fn render_page(state: &AppState, cart: &Cart, modal: CartModal) -> HomeTemplate {
    HomeTemplate {
        nav_links: NAV_SECTIONS
            .iter()
            .map(|&(href, label)| NavLinkView::new(href, label))
            .collect(),
        hero_link: NavLinkView::new("#menu", "Ver Menú"),
        sections: state
            .catalog()
            .sections()
            .iter()
            .map(MenuSectionView::from)
            .collect(),
        cart: CartView::from(cart),
        count: cart.item_count(),
        modal,
        effects: PageEffects::default(),
    }
}

/// Display the home page with the cart modal closed.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> HomeTemplate {
    let cart = load_cart(&session).await;
    render_page(&state, &cart, CartModal::default())
}
