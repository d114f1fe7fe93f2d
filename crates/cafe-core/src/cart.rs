//! # Cart
//!
//! The storefront's shopping cart: an ordered list of line items, unique by
//! (menu item, variant), observed by whichever page is on screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Page Action              Cart Method             Cart State Change     │
//! │  ───────────              ───────────             ─────────────────     │
//! │                                                                         │
//! │  "Add to cart" ─────────► add_item() ──────────► push or qty += n      │
//! │                                                                         │
//! │  "+" on cart row ───────► increase_quantity() ──► qty += delta         │
//! │                                                                         │
//! │  "−" on cart row ───────► decrease_quantity() ──► qty -= delta         │
//! │                                                   (≤ 0 → row removed)   │
//! │                                                                         │
//! │  Invoice paid ──────────► clear() ─────────────► items.clear()         │
//! │                                                                         │
//! │  Every successful mutation fires the listener exactly once with the    │
//! │  post-mutation snapshot. Failed mutations change nothing and fire      │
//! │  nothing.                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use ts_rs::TS;

use crate::error::CartError;
use crate::money::{CurrencyFormatter, Money};
use crate::notify::{ChangeNotifier, Listener, SingleSlot};
use crate::types::{CafeItem, Variant};
use crate::validation::validate_quantity;

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Design Notes
/// - `cafe_item` / `variant` are snapshots taken when the line was created;
///   they travel to the backend as-is in the order request
/// - `quantity` is never below 1 while the line exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub cafe_item: CafeItem,
    pub variant: Variant,
    pub quantity: i64,
}

impl CartItem {
    /// Identity of this line.
    pub fn key(&self) -> CartItemKey {
        CartItemKey::new(&self.cafe_item.id, &self.variant.id)
    }

    /// Element id used by the cart list (`"{item}-{variant}"`).
    pub fn element_id(&self) -> String {
        format!("{}-{}", self.cafe_item.id, self.variant.id)
    }

    /// `variant.cost * quantity`.
    pub fn total_cost(&self) -> Money {
        self.variant.cost.multiply_quantity(self.quantity)
    }

    pub fn display_total_cost(&self, formatter: &dyn CurrencyFormatter) -> String {
        formatter.format(self.total_cost())
    }

    fn matches(&self, key: &CartItemKey) -> bool {
        self.cafe_item.id == key.item_id && self.variant.id == key.variant_id
    }
}

/// Identity of a cart line: (menu item id, variant id).
///
/// Pages keep keys instead of borrowing rows, so they can hand them back to
/// the cart for `increase_quantity` / `decrease_quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartItemKey {
    pub item_id: String,
    pub variant_id: String,
}

impl CartItemKey {
    pub fn new(item_id: impl Into<String>, variant_id: impl Into<String>) -> Self {
        CartItemKey {
            item_id: item_id.into(),
            variant_id: variant_id.into(),
        }
    }
}

impl From<&CartItem> for CartItemKey {
    fn from(item: &CartItem) -> Self {
        item.key()
    }
}

impl fmt::Display for CartItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.item_id, self.variant_id)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `(cafe_item.id, variant.id)`
/// - Every item has `quantity >= 1`
/// - Insertion order is display order
///
/// The cart lives for the whole session. It is created empty, handed to the
/// pages by reference and only emptied by [`Cart::clear`].
pub struct Cart<N = SingleSlot<[CartItem]>> {
    items: Vec<CartItem>,
    formatter: Box<dyn CurrencyFormatter>,
    listener: N,
}

impl Cart {
    /// Creates an empty cart with the single-slot listener.
    pub fn new(formatter: impl CurrencyFormatter + 'static) -> Self {
        Cart::with_notifier(formatter, SingleSlot::new())
    }
}

impl<N> Cart<N>
where
    N: ChangeNotifier<[CartItem]>,
{
    /// Creates an empty cart with a caller-supplied notifier.
    pub fn with_notifier(formatter: impl CurrencyFormatter + 'static, notifier: N) -> Self {
        Cart {
            items: Vec::new(),
            formatter: Box::new(formatter),
            listener: notifier,
        }
    }

    /// Current snapshot, in display order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks a line up by identity.
    pub fn get(&self, key: &CartItemKey) -> Option<&CartItem> {
        self.items.iter().find(|i| i.matches(key))
    }

    /// Adds `quantity` of `variant` to the cart.
    ///
    /// ## Behavior
    /// - Same (item, variant) already in cart: its quantity increases
    /// - Otherwise: a new line is appended at the end
    ///
    /// ## Errors
    /// `InvalidQuantity` for `quantity <= 0`, `QuantityOverflow` when the
    /// merged quantity does not fit; nothing changes either way.
    pub fn add_item(
        &mut self,
        cafe_item: &CafeItem,
        variant: &Variant,
        quantity: i64,
    ) -> Result<(), CartError> {
        validate_quantity(quantity)?;

        let key = CartItemKey::new(&cafe_item.id, &variant.id);
        if let Some(item) = self.items.iter_mut().find(|i| i.matches(&key)) {
            item.quantity = checked_quantity(item.quantity, quantity, &key)?;
            debug!(item = %key, quantity = item.quantity, "Increased existing cart line");
        } else {
            self.items.push(CartItem {
                cafe_item: cafe_item.clone(),
                variant: variant.clone(),
                quantity,
            });
            debug!(item = %key, quantity, "Appended cart line");
        }

        self.notify();
        Ok(())
    }

    /// Adds `delta` to an existing line.
    pub fn increase_quantity(&mut self, key: &CartItemKey, delta: i64) -> Result<(), CartError> {
        validate_quantity(delta)?;
        let index = self.position(key)?;

        let item = &mut self.items[index];
        item.quantity = checked_quantity(item.quantity, delta, key)?;
        debug!(item = %key, quantity = self.items[index].quantity, "Increased quantity");

        self.notify();
        Ok(())
    }

    /// Subtracts `delta` from an existing line; the line is removed when the
    /// result drops to zero or below.
    pub fn decrease_quantity(&mut self, key: &CartItemKey, delta: i64) -> Result<(), CartError> {
        validate_quantity(delta)?;
        let index = self.position(key)?;

        let remaining = self.items[index].quantity - delta;
        if remaining <= 0 {
            self.items.remove(index);
            debug!(item = %key, "Removed cart line");
        } else {
            self.items[index].quantity = remaining;
            debug!(item = %key, quantity = remaining, "Decreased quantity");
        }

        self.notify();
        Ok(())
    }

    /// Empties the cart (after a successful order).
    pub fn clear(&mut self) {
        self.items.clear();
        debug!("Cart cleared");
        self.notify();
    }

    /// Total number of portions (sum of quantities), saturating.
    pub fn portion_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, i| total.saturating_add(i.quantity))
    }

    /// Sum of `total_cost` over all lines.
    pub fn total_cost(&self) -> Money {
        self.items.iter().map(CartItem::total_cost).sum()
    }

    pub fn display_total_cost(&self) -> String {
        self.formatter.format(self.total_cost())
    }

    /// Formats an arbitrary amount with the cart's currency formatter.
    pub fn display_cost(&self, amount: Money) -> String {
        self.formatter.format(amount)
    }

    pub fn formatter(&self) -> &dyn CurrencyFormatter {
        self.formatter.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    // =========================================================================
    // Listener
    // =========================================================================

    /// Installs the items-change listener, replacing any previous one.
    pub fn on_items_change(&mut self, listener: impl FnMut(&[CartItem]) + 'static) {
        self.set_items_change_listener(Some(Box::new(listener)));
    }

    /// Installs (`Some`) or removes (`None`) the items-change listener.
    pub fn set_items_change_listener(&mut self, listener: Option<Listener<[CartItem]>>) {
        debug!(installed = listener.is_some(), "Cart listener replaced");
        self.listener.set_listener(listener);
    }

    /// Removes the items-change listener. Pages call this when they close.
    pub fn clear_items_change_listener(&mut self) {
        self.set_items_change_listener(None);
    }

    pub fn has_items_change_listener(&self) -> bool {
        self.listener.has_listener()
    }

    fn position(&self, key: &CartItemKey) -> Result<usize, CartError> {
        self.items
            .iter()
            .position(|i| i.matches(key))
            .ok_or_else(|| CartError::ItemNotInCart {
                item_id: key.item_id.clone(),
                variant_id: key.variant_id.clone(),
            })
    }

    fn notify(&mut self) {
        self.listener.notify(&self.items);
    }
}

fn checked_quantity(current: i64, delta: i64, key: &CartItemKey) -> Result<i64, CartError> {
    current
        .checked_add(delta)
        .ok_or_else(|| CartError::QuantityOverflow {
            item_id: key.item_id.clone(),
            variant_id: key.variant_id.clone(),
        })
}

impl<N> fmt::Debug for Cart<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart").field("items", &self.items).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::RubleFormatter;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_item(id: &str, cost: i64) -> CafeItem {
        CafeItem::new(id, format!("Item {}", id), vec![Variant::new("1", "Regular", cost)])
    }

    fn recorder(cart: &mut Cart) -> Rc<RefCell<Vec<Vec<(String, i64)>>>> {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        cart.on_items_change(move |items| {
            sink.borrow_mut().push(
                items
                    .iter()
                    .map(|i| (i.element_id(), i.quantity))
                    .collect(),
            );
        });
        calls
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new(RubleFormatter::default());
        let item = test_item("1", 250);

        cart.add_item(&item, &item.variants[0], 2).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.portion_count(), 2);
        assert_eq!(cart.total_cost(), Money::from_units(500));
        assert_eq!(cart.display_total_cost(), "500 ₽");
    }

    #[test]
    fn test_cart_add_same_identity_increases_quantity() {
        let mut cart = Cart::new(RubleFormatter::default());
        let item = test_item("1", 250);

        for qty in [2, 3, 1] {
            cart.add_item(&item, &item.variants[0], qty).unwrap();
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 6);
    }

    #[test]
    fn test_cart_keeps_insertion_order_and_variant_identity() {
        let mut cart = Cart::new(RubleFormatter::default());
        let burger = CafeItem::new(
            "burger",
            "Burger",
            vec![Variant::new("s", "Small", 300), Variant::new("l", "Large", 450)],
        );
        let tea = test_item("tea", 90);

        cart.add_item(&burger, &burger.variants[1], 1).unwrap();
        cart.add_item(&tea, &tea.variants[0], 1).unwrap();
        cart.add_item(&burger, &burger.variants[0], 2).unwrap();
        cart.add_item(&burger, &burger.variants[1], 1).unwrap();

        let ids: Vec<_> = cart.items().iter().map(CartItem::element_id).collect();
        assert_eq!(ids, vec!["burger-l", "tea-1", "burger-s"]);
        assert_eq!(cart.portion_count(), 5);
        assert_eq!(cart.total_cost(), Money::from_units(450 * 2 + 90 + 300 * 2));
    }

    #[test]
    fn test_invalid_quantity_is_rejected_without_side_effects() {
        let mut cart = Cart::new(RubleFormatter::default());
        let calls = recorder(&mut cart);
        let item = test_item("1", 250);

        assert_eq!(
            cart.add_item(&item, &item.variants[0], 0),
            Err(CartError::InvalidQuantity { quantity: 0 })
        );
        assert!(cart.add_item(&item, &item.variants[0], -3).is_err());
        assert!(cart.is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_quantity_overflow_leaves_cart_unchanged() {
        let mut cart = Cart::new(RubleFormatter::default());
        let item = test_item("latte", 250);
        cart.add_item(&item, &item.variants[0], i64::MAX).unwrap();
        let calls = recorder(&mut cart);
        let key = cart.items()[0].key();

        assert_eq!(
            cart.add_item(&item, &item.variants[0], 1),
            Err(CartError::QuantityOverflow {
                item_id: "latte".into(),
                variant_id: "1".into(),
            })
        );
        assert!(matches!(
            cart.increase_quantity(&key, 1),
            Err(CartError::QuantityOverflow { .. })
        ));

        assert_eq!(cart.items()[0].quantity, i64::MAX);
        assert!(calls.borrow().is_empty());
        assert_eq!(cart.total_cost().units(), i64::MAX);
        assert!(cart.display_total_cost().ends_with(" ₽"));

        let other = test_item("tea", 90);
        cart.add_item(&other, &other.variants[0], 5).unwrap();
        assert_eq!(cart.portion_count(), i64::MAX);
    }

    #[test]
    fn test_decrease_to_zero_removes_item() {
        let mut cart = Cart::new(RubleFormatter::default());
        let a = test_item("a", 100);
        let b = test_item("b", 200);
        cart.add_item(&a, &a.variants[0], 2).unwrap();
        cart.add_item(&b, &b.variants[0], 1).unwrap();

        let key = cart.items()[0].key();
        cart.decrease_quantity(&key, 1).unwrap();
        assert_eq!(cart.get(&key).unwrap().quantity, 1);

        cart.decrease_quantity(&key, 5).unwrap();
        assert!(cart.get(&key).is_none());
        assert_eq!(cart.portion_count(), 1);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_unknown_identity_is_reported() {
        let mut cart = Cart::new(RubleFormatter::default());
        let calls = recorder(&mut cart);
        let key = CartItemKey::new("ghost", "1");

        let err = cart.increase_quantity(&key, 1).unwrap_err();
        assert!(matches!(err, CartError::ItemNotInCart { .. }));
        assert!(cart.decrease_quantity(&key, 1).is_err());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_non_positive_delta_is_rejected() {
        let mut cart = Cart::new(RubleFormatter::default());
        let item = test_item("1", 250);
        cart.add_item(&item, &item.variants[0], 2).unwrap();
        let key = cart.items()[0].key();

        assert!(cart.increase_quantity(&key, 0).is_err());
        assert!(cart.decrease_quantity(&key, -1).is_err());
        assert_eq!(cart.portion_count(), 2);
    }

    #[test]
    fn test_listener_fires_once_per_mutation_with_snapshot() {
        let mut cart = Cart::new(RubleFormatter::default());
        let calls = recorder(&mut cart);
        let item = test_item("1", 250);

        cart.add_item(&item, &item.variants[0], 2).unwrap();
        let key = cart.items()[0].key();
        cart.increase_quantity(&key, 1).unwrap();
        cart.decrease_quantity(&key, 3).unwrap();
        cart.add_item(&item, &item.variants[0], 1).unwrap();
        cart.clear();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], vec![("1-1".to_string(), 2)]);
        assert_eq!(calls[1], vec![("1-1".to_string(), 3)]);
        assert!(calls[2].is_empty());
        assert_eq!(calls[3], vec![("1-1".to_string(), 1)]);
        assert!(calls[4].is_empty());
    }

    #[test]
    fn test_cleared_listener_receives_nothing() {
        let mut cart = Cart::new(RubleFormatter::default());
        let calls = recorder(&mut cart);
        let item = test_item("1", 250);

        cart.add_item(&item, &item.variants[0], 1).unwrap();
        cart.clear_items_change_listener();
        cart.add_item(&item, &item.variants[0], 1).unwrap();
        cart.clear();

        assert_eq!(calls.borrow().len(), 1);
        assert!(!cart.has_items_change_listener());
    }

    #[test]
    fn test_cart_clear_formats_zero() {
        let mut cart = Cart::new(RubleFormatter::default());
        let item = test_item("1", 1250);
        cart.add_item(&item, &item.variants[0], 2).unwrap();
        assert_eq!(cart.display_total_cost(), "2\u{a0}500 ₽");

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.display_total_cost(), "0 ₽");
    }

    #[test]
    fn test_cart_item_serializes_for_order_request() {
        let item = test_item("1", 250);
        let line = CartItem {
            cafe_item: item.clone(),
            variant: item.variants[0].clone(),
            quantity: 2,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["cafeItem"]["name"], "Item 1");
        assert_eq!(json["variant"]["cost"], 250);
        assert_eq!(json["quantity"], 2);
    }
}
