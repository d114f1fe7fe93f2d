//! Category page: the menu of one category.

use tracing::{debug, warn};

use cafe_core::{CafeItem, Route};

use super::menu::MenuList;
use super::{decode, refresh_cart_button, PageEvent, PageParams, CART, CATEGORY, DETAILS};
use crate::app::Session;
use crate::requests::RequestTag;

const CATEGORY_LIST: &str = "cafe-category";

#[derive(Debug)]
pub struct CategoryPage {
    menu: MenuList,
}

impl Default for CategoryPage {
    fn default() -> Self {
        CategoryPage {
            menu: MenuList::new(CATEGORY_LIST),
        }
    }
}

impl Route<Session, PageParams, PageEvent> for CategoryPage {
    fn name(&self) -> &str {
        CATEGORY
    }

    fn view_path(&self) -> &str {
        "/pages/category.html"
    }

    fn load(&mut self, ctx: &mut Session, params: Option<PageParams>) {
        ctx.platform.expand();
        refresh_cart_button(ctx);
        self.menu.reset();

        match params {
            Some(PageParams::Category { id }) => {
                ctx.requests.get(RequestTag::CategoryMenu, format!("/menu/{}", id));
            }
            other => warn!(params = ?other, "Category page needs a category id"),
        }
    }

    fn handle(&mut self, ctx: &mut Session, event: PageEvent) {
        match event {
            PageEvent::Response {
                tag: RequestTag::CategoryMenu,
                result,
            } => {
                if let Some(items) = decode::<Vec<CafeItem>>(RequestTag::CategoryMenu, result) {
                    self.menu.fill(ctx, items);
                }
            }
            PageEvent::ItemSelected(id) => ctx.navigate(DETAILS, Some(PageParams::menu_item(id))),
            PageEvent::StepperIncrement(id) => self.menu.change_quantity(ctx, &id, 1),
            PageEvent::StepperDecrement(id) => self.menu.change_quantity(ctx, &id, -1),
            PageEvent::AddToCart(id) => self.menu.add_to_cart(ctx, &id),
            PageEvent::MainButtonClicked => ctx.navigate(CART, None),
            other => debug!(event = ?other, "Event ignored by the category page"),
        }
    }
}
