//! The cart store.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s keyed by product name. It
//! is mutated through exactly four operations (add, increase, decrease,
//! remove) and keeps two invariants at all times:
//!
//! - no two line items share a name
//! - every quantity is at least one
//!
//! [`CartStore`] owns a cart together with a [`RenderSink`] and forwards a
//! full [`CartSnapshot`] to the sink after each mutation. The view layer never
//! patches the cart markup incrementally; it redraws from the snapshot.
//!
//! # Example
//!
//! ```
//! use pasteleria_core::{CartSnapshot, CartStore, Price, ProductName};
//!
//! let mut renders: Vec<CartSnapshot> = Vec::new();
//! let mut store = CartStore::new(|snapshot: &CartSnapshot| renders.push(snapshot.clone()));
//!
//! let cake = ProductName::parse("Cake").unwrap();
//! store.add(cake.clone(), Price::from_cents(2500).unwrap());
//! store.add(cake, Price::from_cents(2500).unwrap());
//! assert!(!store.decrease("Pie"));
//!
//! assert_eq!(store.item_count(), 2);
//! assert_eq!(store.total_price().to_string(), "S/ 50.00");
//! drop(store);
//! assert_eq!(renders.len(), 2);
//! ```

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductName};

/// Errors raised when rebuilding a cart from stored data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Two stored line items share a name.
    #[error("duplicate line item: {0}")]
    DuplicateItem(ProductName),
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    name: ProductName,
    unit_price: Price,
    quantity: NonZeroU32,
}

impl LineItem {
    fn new(name: ProductName, unit_price: Price) -> Self {
        Self {
            name,
            unit_price,
            quantity: NonZeroU32::MIN,
        }
    }

    /// The product name, unique within a cart.
    #[must_use]
    pub const fn name(&self) -> &ProductName {
        &self.name
    }

    /// Price per unit, fixed when the product was first added.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Number of units, always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity.get())
    }

    fn increment(&mut self) -> bool {
        match self.quantity.checked_add(1) {
            Some(next) => {
                self.quantity = next;
                true
            }
            None => false,
        }
    }

    fn decrement(&mut self) -> bool {
        match NonZeroU32::new(self.quantity.get() - 1) {
            Some(next) => {
                self.quantity = next;
                true
            }
            None => false,
        }
    }
}

/// An ordered, name-unique list of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns `true` if the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by product name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.name == name)
    }

    /// Add one unit of a product.
    ///
    /// An existing line item gets its quantity bumped and keeps the price it
    /// was first added with; `unit_price` is ignored in that case. Otherwise a
    /// new line item with quantity one is appended.
    ///
    /// Returns `false` only when the quantity is already at `u32::MAX`.
    pub fn add(&mut self, name: ProductName, unit_price: Price) -> bool {
        if let Some(item) = self.get_mut(name.as_str()) {
            return item.increment();
        }
        self.items.push(LineItem::new(name, unit_price));
        true
    }

    /// Add one unit of a product already in the cart. No-op if absent.
    pub fn increase(&mut self, name: &str) -> bool {
        self.get_mut(name).is_some_and(LineItem::increment)
    }

    /// Take one unit away, never going below one. No-op if absent.
    ///
    /// A line item at quantity one is left alone; taking it out of the cart
    /// is [`Cart::remove`]'s job.
    pub fn decrease(&mut self, name: &str) -> bool {
        self.get_mut(name).is_some_and(LineItem::decrement)
    }

    /// Drop a product from the cart. No-op if absent.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        self.items.len() != before
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Sum of every line item's subtotal.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// One summary line per item, in cart order.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<SummaryLine> {
        self.items
            .iter()
            .map(|item| SummaryLine {
                name: item.name.clone(),
                quantity: item.quantity(),
                subtotal: item.subtotal(),
            })
            .collect()
    }

    /// Everything the view layer needs to redraw the cart.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self
                .items
                .iter()
                .map(|item| SnapshotLine {
                    name: item.name.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity(),
                    subtotal: item.subtotal(),
                })
                .collect(),
            item_count: self.item_count(),
            total: self.total_price(),
        }
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        for (index, item) in items.iter().enumerate() {
            if items.iter().skip(index + 1).any(|other| other.name == item.name) {
                return Err(CartError::DuplicateItem(item.name.clone()));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

/// A line of the order summary sent at checkout.
///
/// Displays as `• <name> x<quantity> - S/ <subtotal>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub name: ProductName,
    pub quantity: u32,
    pub subtotal: Price,
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "• {} x{} - {}", self.name, self.quantity, self.subtotal)
    }
}

/// A line item as seen by the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotLine {
    pub name: ProductName,
    pub unit_price: Price,
    pub quantity: u32,
    pub subtotal: Price,
}

/// Full re-render request emitted after a cart mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<SnapshotLine>,
    pub item_count: u64,
    pub total: Price,
}

impl CartSnapshot {
    /// Returns `true` if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Consumer of cart re-render requests.
pub trait RenderSink {
    /// Redraw the cart from scratch.
    fn render(&mut self, snapshot: &CartSnapshot);
}

impl RenderSink for () {
    fn render(&mut self, _snapshot: &CartSnapshot) {}
}

impl<F> RenderSink for F
where
    F: FnMut(&CartSnapshot),
{
    fn render(&mut self, snapshot: &CartSnapshot) {
        self(snapshot);
    }
}

/// A cart plus the sink that redraws it.
///
/// `add` and `remove` always request a render. `increase` and `decrease`
/// request one only when the cart actually changed.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    sink: S,
}

impl<S: RenderSink> CartStore<S> {
    /// Create a store around an empty cart.
    pub const fn new(sink: S) -> Self {
        Self::with_cart(Cart::new(), sink)
    }

    /// Create a store around an existing cart, e.g. one loaded from a session.
    pub const fn with_cart(cart: Cart, sink: S) -> Self {
        Self { cart, sink }
    }

    /// The current cart.
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The render sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Split the store back into its cart and sink.
    pub fn into_parts(self) -> (Cart, S) {
        (self.cart, self.sink)
    }

    /// See [`Cart::add`]. Always re-renders.
    pub fn add(&mut self, name: ProductName, unit_price: Price) {
        tracing::debug!(product = %name, price = %unit_price, "cart add");
        self.cart.add(name, unit_price);
        self.render();
    }

    /// See [`Cart::increase`]. Re-renders only if the cart changed.
    pub fn increase(&mut self, name: &str) -> bool {
        let changed = self.cart.increase(name);
        tracing::debug!(product = name, changed, "cart increase");
        if changed {
            self.render();
        }
        changed
    }

    /// See [`Cart::decrease`]. Re-renders only if the cart changed.
    pub fn decrease(&mut self, name: &str) -> bool {
        let changed = self.cart.decrease(name);
        tracing::debug!(product = name, changed, "cart decrease");
        if changed {
            self.render();
        }
        changed
    }

    /// See [`Cart::remove`]. Always re-renders.
    pub fn remove(&mut self, name: &str) -> bool {
        let changed = self.cart.remove(name);
        tracing::debug!(product = name, changed, "cart remove");
        self.render();
        changed
    }

    /// See [`Cart::item_count`].
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// See [`Cart::total_price`].
    pub fn total_price(&self) -> Price {
        self.cart.total_price()
    }

    /// See [`Cart::summary_lines`].
    pub fn summary_lines(&self) -> Vec<SummaryLine> {
        self.cart.summary_lines()
    }

    fn render(&mut self) {
        let snapshot = self.cart.snapshot();
        self.sink.render(&snapshot);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn name(s: &str) -> ProductName {
        ProductName::parse(s).unwrap()
    }

    fn soles(cents: i64) -> Price {
        Price::from_cents(cents).unwrap()
    }

    /// Sink that records every snapshot it receives.
    #[derive(Default)]
    struct Recorder(Vec<CartSnapshot>);

    impl RenderSink for Recorder {
        fn render(&mut self, snapshot: &CartSnapshot) {
            self.0.push(snapshot.clone());
        }
    }

    #[test]
    fn test_add_single_item() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(2500));

        assert_eq!(cart.items().len(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.name(), "Cake");
        assert_eq!(item.unit_price(), soles(2500));
        assert_eq!(item.quantity(), 1);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_price(), soles(2500));
    }

    #[test]
    fn test_add_same_item_twice_increments() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(2500));
        cart.add(name("Cake"), soles(2500));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity(), 2);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_price(), soles(5000));
    }

    #[test]
    fn test_add_existing_keeps_first_price() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(2500));
        cart.add(name("Cake"), soles(9900));

        assert_eq!(cart.items()[0].unit_price(), soles(2500));
        assert_eq!(cart.total_price(), soles(5000));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add(name("Pie"), soles(1500));
        cart.add(name("Cake"), soles(1000));
        cart.add(name("Pie"), soles(1500));

        let names: Vec<&str> = cart.items().iter().map(|i| i.name().as_str()).collect();
        assert_eq!(names, ["Pie", "Cake"]);
    }

    #[test]
    fn test_decrease_floors_at_one() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(1000));
        cart.add(name("Pie"), soles(1500));

        assert!(!cart.decrease("Cake"));
        assert_eq!(cart.get("Cake").unwrap().quantity(), 1);
        assert_eq!(cart.total_price(), soles(2500));
    }

    #[test]
    fn test_decrease_from_two() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(1000));
        cart.increase("Cake");

        assert!(cart.decrease("Cake"));
        assert_eq!(cart.get("Cake").unwrap().quantity(), 1);
    }

    #[test]
    fn test_missing_name_is_noop() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(1000));
        let before = cart.clone();

        assert!(!cart.increase("Pie"));
        assert!(!cart.decrease("Pie"));
        assert!(!cart.remove("Pie"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_to_empty() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(1000));
        cart.increase("Cake");

        assert!(cart.remove("Cake"));
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
        assert_eq!(cart.total_price().to_string(), "S/ 0.00");
    }

    #[test]
    fn test_remove_twice_same_as_once() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(1000));
        cart.add(name("Pie"), soles(1500));

        assert!(cart.remove("Cake"));
        let once = cart.clone();
        assert!(!cart.remove("Cake"));
        assert_eq!(cart, once);
    }

    #[test]
    fn test_summary_lines_format() {
        let mut cart = Cart::new();
        cart.add(name("Torta de Chocolate"), soles(4500));
        cart.add(name("Torta de Chocolate"), soles(4500));
        cart.add(name("Alfajor"), "3.5".parse().unwrap());

        let lines: Vec<String> = cart.summary_lines().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                "• Torta de Chocolate x2 - S/ 90.00",
                "• Alfajor x1 - S/ 3.50",
            ]
        );
    }

    #[test]
    fn test_snapshot_carries_derived_values() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(1000));
        cart.add(name("Cake"), soles(1000));
        cart.add(name("Pie"), soles(1500));

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.item_count, 3);
        assert_eq!(snapshot.total, soles(3500));
        assert_eq!(snapshot.lines[0].subtotal, soles(2000));
        assert_eq!(snapshot.lines[1].quantity, 1);
        assert!(Cart::new().snapshot().is_empty());
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[
            {"name": "Cake", "unit_price": "10", "quantity": 1},
            {"name": "Cake", "unit_price": "10", "quantity": 2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        let json = r#"[{"name": "Cake", "unit_price": "10", "quantity": 0}]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(1000));
        cart.add(name("Pie"), soles(1550));
        cart.increase("Pie");

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_try_from_reports_duplicate_name() {
        let mut cart = Cart::new();
        cart.add(name("Cake"), soles(1000));
        let mut items: Vec<LineItem> = cart.into();
        items.push(items[0].clone());
        assert_eq!(
            Cart::try_from(items),
            Err(CartError::DuplicateItem(name("Cake")))
        );
    }

    #[test]
    fn test_store_add_and_remove_always_render() {
        let mut store = CartStore::new(Recorder::default());
        store.add(name("Cake"), soles(2500));
        store.remove("Pie");
        store.remove("Cake");

        let renders = &store.sink().0;
        assert_eq!(renders.len(), 3);
        assert_eq!(renders[0].item_count, 1);
        assert_eq!(renders[1].item_count, 1);
        assert!(renders[2].is_empty());
    }

    #[test]
    fn test_store_increase_decrease_render_only_on_change() {
        let mut store = CartStore::new(Recorder::default());
        store.add(name("Cake"), soles(1000));

        assert!(!store.decrease("Cake"));
        assert!(!store.increase("Pie"));
        assert_eq!(store.sink().0.len(), 1);

        assert!(store.increase("Cake"));
        assert!(store.decrease("Cake"));
        assert_eq!(store.sink().0.len(), 3);
        assert_eq!(store.sink().0[1].item_count, 2);
        assert_eq!(store.sink().0[2].item_count, 1);
    }

    #[test]
    fn test_store_with_existing_cart() {
        let mut cart = Cart::new();
        cart.add(name("Pie"), soles(1500));
        let mut store = CartStore::with_cart(cart, ());
        store.add(name("Pie"), soles(1500));

        assert_eq!(store.item_count(), 2);
        assert_eq!(store.total_price(), soles(3000));
        assert_eq!(store.summary_lines().len(), 1);
        let (cart, ()) = store.into_parts();
        assert_eq!(cart.get("Pie").unwrap().quantity(), 2);
    }

    #[test]
    fn test_quantity_saturates_at_max() {
        let json = r#"[{"name": "Cake", "unit_price": "10", "quantity": 4294967295}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        let mut store = CartStore::with_cart(cart, Recorder::default());

        assert!(!store.increase("Cake"));
        assert!(store.sink().0.is_empty());

        store.add(name("Cake"), soles(1000));
        assert_eq!(store.sink().0.len(), 1);
        assert_eq!(store.cart().get("Cake").unwrap().quantity(), u32::MAX);
        assert_eq!(store.item_count(), u64::from(u32::MAX));
        assert_eq!(store.total_price(), soles(1000).times(u32::MAX));
        assert_eq!(store.total_price().to_string(), "S/ 42949672950.00");
        assert_eq!(store.sink().0[0].item_count, u64::from(u32::MAX));
    }

    #[test]
    fn test_store_with_closure_sink() {
        let mut totals = Vec::new();
        {
            let mut store = CartStore::new(|s: &CartSnapshot| totals.push(s.total));
            store.add(name("Cake"), soles(1000));
            store.increase("Cake");
        }
        assert_eq!(totals, [soles(1000), soles(2000)]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(&'static str, i64),
        Increase(&'static str),
        Decrease(&'static str),
        Remove(&'static str),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let names = prop::sample::select(vec!["Cake", "Pie", "Tart", "Flan"]);
        prop_oneof![
            (names.clone(), 0i64..10_000).prop_map(|(n, c)| Op::Add(n, c)),
            names.clone().prop_map(Op::Increase),
            names.clone().prop_map(Op::Decrease),
            names.prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn cart_invariants_hold(ops in prop::collection::vec(op_strategy(), 0..64)) {
            let mut cart = Cart::new();
            for op in ops {
                match op {
                    Op::Add(n, c) => { cart.add(name(n), soles(c)); }
                    Op::Increase(n) => { cart.increase(n); }
                    Op::Decrease(n) => { cart.decrease(n); }
                    Op::Remove(n) => { cart.remove(n); }
                }

                for (i, item) in cart.items().iter().enumerate() {
                    prop_assert!(item.quantity() >= 1);
                    prop_assert!(cart.items()[i + 1..].iter().all(|o| o.name() != item.name()));
                }

                let count: u64 = cart.items().iter().map(|i| u64::from(i.quantity())).sum();
                prop_assert_eq!(cart.item_count(), count);

                let total = cart.items().iter().fold(Price::ZERO, |acc, i| acc + i.unit_price() * i.quantity());
                prop_assert_eq!(cart.total_price(), total);
            }
        }

        #[test]
        fn decrease_never_removes(start in 1u32..5, steps in 0usize..10) {
            let mut cart = Cart::new();
            cart.add(name("Cake"), soles(100));
            for _ in 1..start {
                cart.increase("Cake");
            }
            for _ in 0..steps {
                cart.decrease("Cake");
            }
            let expected = u32::try_from((start as usize).saturating_sub(steps).max(1)).unwrap();
            prop_assert_eq!(cart.get("Cake").map(LineItem::quantity), Some(expected));
        }
    }
}
