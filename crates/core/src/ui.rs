//! Page-level UI state: cart modal, navbar, reveal animations, anchor
//! scrolling and add-button feedback.
//!
//! The server renders the initial page from these: classes, thresholds,
//! labels and which links scroll in place. The browser script only animates
//! the transitions with the same values.

use core::time::Duration;

/// CSS class marking an open modal or an expanded menu.
pub const ACTIVE_CLASS: &str = "active";

/// CSS class for the navbar once the page has scrolled past the threshold.
pub const SCROLLED_CLASS: &str = "scrolled";

/// CSS class added to a fade-in element once it has been revealed.
pub const VISIBLE_CLASS: &str = "visible";

/// CSS class marking elements that fade in when scrolled into view.
pub const FADE_IN_CLASS: &str = "fade-in-up";

/// CSS class on `<body>` while page scroll is locked.
pub const SCROLL_LOCKED_CLASS: &str = "scroll-locked";

/// Element id of the cart icon in the navbar.
pub const CART_ICON_ID: &str = "cart-icon";

/// Element id of the checkout button.
pub const CHECKOUT_BUTTON_ID: &str = "checkout-btn";

/// Scroll offset, in CSS pixels, the navbar must pass to switch style.
pub const NAVBAR_SCROLL_THRESHOLD: f64 = 100.0;

/// Visibility of the cart modal and the page scroll lock that goes with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartModal {
    open: bool,
}

impl CartModal {
    /// Show the modal and lock page scroll.
    pub const fn open(&mut self) {
        self.open = true;
    }

    /// The page body does not scroll while the modal is open.
    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.open
    }

    /// Class list for the modal element.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        if self.open { "cart-modal active" } else { "cart-modal" }
    }

    /// Class list for `<body>`.
    #[must_use]
    pub const fn body_class(&self) -> &'static str {
        if self.scroll_locked() { SCROLL_LOCKED_CLASS } else { "" }
    }
}

/// Options for the observer that reveals fade-in elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeInOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Margin applied to the viewport before intersecting.
    pub root_margin: &'static str,
}

impl FadeInOptions {
    pub const STANDARD: Self = Self {
        threshold: 0.1,
        root_margin: "0px 0px -50px 0px",
    };
}

impl Default for FadeInOptions {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// What a click on an in-page link should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorAction {
    /// Let the browser handle it (or another handler, for cart and checkout).
    Ignore,
    /// Prevent the default jump and scroll smoothly to the element with this id.
    ScrollTo(String),
}

impl AnchorAction {
    /// Target element id, if the link scrolls in place.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Ignore => None,
            Self::ScrollTo(id) => Some(id.as_str()),
        }
    }
}

/// Decide how an `<a href="#...">` click is handled.
///
/// The bare `#`, the cart icon and the checkout button have their own
/// handlers and are ignored, as is any link that is not a fragment.
#[must_use]
pub fn resolve_anchor(href: &str, element_id: Option<&str>) -> AnchorAction {
    if matches!(element_id, Some(CART_ICON_ID | CHECKOUT_BUTTON_ID)) {
        return AnchorAction::Ignore;
    }
    match href.strip_prefix('#') {
        Some(target) if !target.is_empty() => AnchorAction::ScrollTo(target.to_owned()),
        _ => AnchorAction::Ignore,
    }
}

/// Label of an add-to-cart button, with a short confirmation after a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddButtonFeedback {
    #[default]
    Idle,
    Added,
}

impl AddButtonFeedback {
    /// How long the confirmation label stays up.
    pub const CONFIRMATION: Duration = Duration::from_millis(1000);

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "🛒 Agregar",
            Self::Added => "✓ Agregado",
        }
    }
}
