//! Menu item list with per-item quantity steppers, shared by the root and
//! category pages.

use std::collections::HashMap;
use tracing::{debug, warn};

use cafe_core::{CafeItem, CurrencyFormatter};

use super::{refresh_cart_button, ADDED_TO_CART};
use crate::app::Session;
use crate::screen::{ListRow, SnackbarKind};

#[derive(Debug)]
pub(crate) struct MenuList {
    container: &'static str,
    items: Vec<CafeItem>,
    steppers: HashMap<String, i64>,
}

impl MenuList {
    pub(crate) fn new(container: &'static str) -> Self {
        MenuList {
            container,
            items: Vec::new(),
            steppers: HashMap::new(),
        }
    }

    /// Forgets items and stepper values from a previous visit.
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.steppers.clear();
    }

    /// Replaces the placeholder rows with `items`, steppers at zero.
    pub(crate) fn fill(&mut self, ctx: &mut Session, items: Vec<CafeItem>) {
        self.items = items.into_iter().map(CafeItem::normalized).collect();
        self.steppers = self.items.iter().map(|i| (i.id.clone(), 0)).collect();

        let rows = self
            .items
            .iter()
            .map(|item| {
                let price = item
                    .default_variant()
                    .map(|v| ctx.formatter().format(v.cost))
                    .unwrap_or_default();
                ListRow::new(&item.id)
                    .field("name", &item.name)
                    .field("description", &item.description)
                    .field("image", &item.image)
                    .field("price", price)
                    .field("quantity", "0")
            })
            .collect();

        debug!(container = self.container, items = self.items.len(), "Menu filled");
        ctx.screen.borrow_mut().list_mut(self.container).replace(rows);
    }

    /// Steps an item's counter by `delta`, never below zero.
    pub(crate) fn change_quantity(&mut self, ctx: &mut Session, item_id: &str, delta: i64) {
        let Some(current) = self.steppers.get_mut(item_id) else {
            warn!(item_id, "Stepper for unknown item");
            return;
        };
        *current = (*current + delta).max(0);
        let value = *current;
        self.render_stepper(ctx, item_id, value);
    }

    /// Adds the stepper quantity of the item's first variant to the cart.
    /// Does nothing while the stepper is at zero.
    pub(crate) fn add_to_cart(&mut self, ctx: &mut Session, item_id: &str) {
        let quantity = self.steppers.get(item_id).copied().unwrap_or(0);
        if quantity <= 0 {
            debug!(item_id, "Add to cart with empty stepper ignored");
            return;
        }

        let Some(item) = self.items.iter().find(|i| i.id == item_id) else {
            warn!(item_id, "Add to cart for unknown item");
            return;
        };
        let Some(variant) = item.default_variant() else {
            warn!(item_id, "Menu item has no variants");
            return;
        };

        if let Err(e) = ctx.cart.add_item(item, variant, quantity) {
            warn!(item_id, error = %e, "Add to cart rejected");
            return;
        }

        self.steppers.insert(item_id.to_string(), 0);
        self.render_stepper(ctx, item_id, 0);
        refresh_cart_button(ctx);
        ctx.show_snackbar(ADDED_TO_CART, SnackbarKind::Success);
    }

    fn render_stepper(&self, ctx: &mut Session, item_id: &str, value: i64) {
        let mut screen = ctx.screen.borrow_mut();
        if let Some(row) = screen.list_mut(self.container).row_mut(item_id) {
            row.fields.insert("quantity".to_string(), value.to_string());
        }
    }
}
