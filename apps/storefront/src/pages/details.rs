//! Details page: one menu item, variant picker and quantity.
//!
//! The main button reads `"ДОБАВИТЬ В КОРЗИНУ • {cost}"` for the current
//! selection; clicking it puts the selection in the cart and returns to the
//! root page.

use tracing::{debug, warn};

use cafe_core::{CafeItem, CurrencyFormatter, Route, Variant};

use super::{decode, PageEvent, PageParams, DETAILS, ROOT};
use crate::app::Session;
use crate::requests::RequestTag;
use crate::screen::ListRow;

const VARIANT_LIST: &str = "details-variants";

#[derive(Debug)]
pub struct DetailsPage {
    item: Option<CafeItem>,
    selected: usize,
    quantity: i64,
}

impl Default for DetailsPage {
    fn default() -> Self {
        DetailsPage {
            item: None,
            selected: 0,
            quantity: 1,
        }
    }
}

impl DetailsPage {
    fn variant(&self) -> Option<(&CafeItem, &Variant)> {
        let item = self.item.as_ref()?;
        item.variants.get(self.selected).map(|v| (item, v))
    }

    fn render(&self, ctx: &mut Session) {
        let Some(item) = self.item.as_ref() else {
            return;
        };

        let rows = item
            .variants
            .iter()
            .enumerate()
            .map(|(index, variant)| {
                ListRow::new(&variant.id)
                    .field("name", &variant.name)
                    .field("cost", ctx.formatter().format(variant.cost))
                    .field("selected", (index == self.selected).to_string())
            })
            .collect();

        {
            let mut screen = ctx.screen.borrow_mut();
            screen.set_text("details-name", &item.name);
            screen.set_text("details-description", &item.description);
            screen.set_text("details-image", &item.image);
            screen.set_text("details-quantity", self.quantity.to_string());
            screen.list_mut(VARIANT_LIST).reconcile(rows);
        }

        match self.variant() {
            Some((_, variant)) => {
                let cost = ctx
                    .formatter()
                    .format(variant.cost.multiply_quantity(self.quantity));
                ctx.platform
                    .show_main_button(&format!("ДОБАВИТЬ В КОРЗИНУ • {}", cost));
            }
            None => ctx.platform.hide_main_button(),
        }
    }

    fn add_selection(&self, ctx: &mut Session) {
        let Some((item, variant)) = self.variant() else {
            debug!("Nothing selected on the details page");
            return;
        };

        match ctx.cart.add_item(item, variant, self.quantity) {
            Ok(()) => ctx.navigate(ROOT, None),
            Err(e) => warn!(item_id = %item.id, error = %e, "Add to cart rejected"),
        }
    }
}

impl Route<Session, PageParams, PageEvent> for DetailsPage {
    fn name(&self) -> &str {
        DETAILS
    }

    fn view_path(&self) -> &str {
        "/pages/details.html"
    }

    fn load(&mut self, ctx: &mut Session, params: Option<PageParams>) {
        *self = DetailsPage::default();

        match params {
            Some(PageParams::MenuItem { id }) => {
                ctx.requests
                    .get(RequestTag::ItemDetails, format!("/menu/details/{}", id));
            }
            other => warn!(params = ?other, "Details page needs a menu item id"),
        }
    }

    fn handle(&mut self, ctx: &mut Session, event: PageEvent) {
        match event {
            PageEvent::Response {
                tag: RequestTag::ItemDetails,
                result,
            } => {
                if let Some(item) = decode::<CafeItem>(RequestTag::ItemDetails, result) {
                    self.item = Some(item.normalized());
                    self.render(ctx);
                }
            }
            PageEvent::VariantSelected(variant_id) => {
                let index = self
                    .item
                    .as_ref()
                    .and_then(|item| item.variants.iter().position(|v| v.id == variant_id));
                match index {
                    Some(index) => {
                        self.selected = index;
                        self.render(ctx);
                    }
                    None => warn!(variant_id = %variant_id, "Unknown variant selected"),
                }
            }
            PageEvent::StepperIncrement(_) => {
                self.quantity += 1;
                self.render(ctx);
            }
            PageEvent::StepperDecrement(_) => {
                self.quantity = (self.quantity - 1).max(1);
                self.render(ctx);
            }
            PageEvent::MainButtonClicked => self.add_selection(ctx),
            other => debug!(event = ?other, "Event ignored by the details page"),
        }
    }
}
