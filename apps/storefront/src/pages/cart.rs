//! Cart page: cart lines with +/- buttons, total and the checkout button.
//!
//! The page is the cart's listener while it is shown, so every mutation
//! (including the ones it triggers itself) re-renders through
//! [`render_cart`].

use tracing::{debug, warn};

use cafe_core::{CartItem, CartItemKey, CurrencyFormatter, Money, Route};

use super::{PageEvent, PageParams, CART, CHECKOUT};
use crate::app::Session;
use crate::error::{Notice, NoticeCode};
use crate::platform::HapticStyle;
use crate::screen::{ListRow, Screen};

const CART_LIST: &str = "cart-items";

#[derive(Debug, Default)]
pub struct CartPage;

impl CartPage {
    fn change_quantity(ctx: &mut Session, key: &CartItemKey, delta: i64) {
        let result = if delta > 0 {
            ctx.cart.increase_quantity(key, delta)
        } else {
            ctx.cart.decrease_quantity(key, -delta)
        };

        match result {
            Ok(()) => ctx.platform.impact_occurred(HapticStyle::Light),
            Err(e) => {
                warn!(item = %key, error = %e, "Cart line change rejected");
                ctx.show_notice(&Notice::new(NoticeCode::CartError, e.to_string()));
            }
        }
    }
}

/// Renders the cart lines, summary, placeholder and checkout button.
pub fn render_cart(screen: &mut Screen, items: &[CartItem], formatter: &dyn CurrencyFormatter) {
    let empty = items.is_empty();
    let total: Money = items.iter().map(CartItem::total_cost).sum();

    screen.set_visible("cart-summary", !empty);
    screen.set_visible("cart-empty-placeholder", empty);
    screen.set_enabled("checkout-button", !empty);
    if !empty {
        screen.set_text("cart-total-cost", formatter.format(total));
    }

    let rows = items
        .iter()
        .map(|item| {
            ListRow::new(item.element_id())
                .field("image", &item.cafe_item.image)
                .field("name", &item.cafe_item.name)
                .field("description", &item.variant.name)
                .field("cost", item.display_total_cost(formatter))
                .field("quantity", item.quantity.to_string())
        })
        .collect();

    let stats = screen.list_mut(CART_LIST).reconcile(rows);
    debug!(
        added = stats.added,
        updated = stats.updated,
        removed = stats.removed,
        "Cart rendered"
    );
}

impl Route<Session, PageParams, PageEvent> for CartPage {
    fn name(&self) -> &str {
        CART
    }

    fn view_path(&self) -> &str {
        "/pages/cart.html"
    }

    fn load(&mut self, ctx: &mut Session, _params: Option<PageParams>) {
        let screen = ctx.screen.clone();
        let formatter = ctx.formatter().clone();
        ctx.cart.on_items_change(move |items| {
            render_cart(&mut screen.borrow_mut(), items, &formatter);
        });

        render_cart(&mut ctx.screen.borrow_mut(), ctx.cart.items(), ctx.formatter());
    }

    fn close(&mut self, ctx: &mut Session) {
        ctx.cart.clear_items_change_listener();
    }

    fn handle(&mut self, ctx: &mut Session, event: PageEvent) {
        match event {
            PageEvent::CartIncrement(key) => Self::change_quantity(ctx, &key, 1),
            PageEvent::CartDecrement(key) => Self::change_quantity(ctx, &key, -1),
            PageEvent::CheckoutRequested => {
                if ctx.cart.is_empty() {
                    debug!("Checkout with an empty cart ignored");
                } else {
                    ctx.navigate(CHECKOUT, None);
                }
            }
            other => debug!(event = ?other, "Event ignored by the cart page"),
        }
    }
}
