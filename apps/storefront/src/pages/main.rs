//! Root page: cafe header, category tiles and the popular menu.

use tracing::debug;

use cafe_core::{CafeInfo, CafeItem, Category, Route};

use super::menu::MenuList;
use super::{decode, refresh_cart_button, PageEvent, PageParams, CART, CATEGORY, DETAILS, ROOT};
use crate::app::Session;
use crate::requests::RequestTag;
use crate::screen::ListRow;

const POPULAR_LIST: &str = "cafe-section-popular";
const CATEGORY_LIST: &str = "cafe-categories";

#[derive(Debug)]
pub struct MainPage {
    popular: MenuList,
}

impl Default for MainPage {
    fn default() -> Self {
        MainPage {
            popular: MenuList::new(POPULAR_LIST),
        }
    }
}

impl MainPage {
    fn fill_cafe_info(ctx: &mut Session, info: CafeInfo) {
        let mut screen = ctx.screen.borrow_mut();
        screen.set_text("cafe-logo", info.logo_image);
        screen.set_text("cafe-cover", info.cover_image);
        screen.set_text("cafe-name", info.name);
        screen.set_text("cafe-kitchen-categories", info.kitchen_categories);
        screen.set_text("cafe-rating", info.rating);
        screen.set_text("cafe-cooking-time", info.cooking_time);
        screen.set_text("cafe-status", info.status);
    }

    fn fill_categories(ctx: &mut Session, categories: Vec<Category>) {
        let rows = categories
            .into_iter()
            .map(|c| {
                ListRow::new(c.id)
                    .field("name", c.name)
                    .field("icon", c.icon)
                    .field("background-color", c.background_color)
            })
            .collect();
        ctx.screen.borrow_mut().list_mut(CATEGORY_LIST).replace(rows);
    }
}

impl Route<Session, PageParams, PageEvent> for MainPage {
    fn name(&self) -> &str {
        ROOT
    }

    fn view_path(&self) -> &str {
        "/pages/main.html"
    }

    fn load(&mut self, ctx: &mut Session, _params: Option<PageParams>) {
        refresh_cart_button(ctx);
        self.popular.reset();

        ctx.requests.get(RequestTag::CafeInfo, "/info");
        ctx.requests.get(RequestTag::Categories, "/categories");
        ctx.requests.get(RequestTag::PopularMenu, "/menu/popular");
    }

    fn handle(&mut self, ctx: &mut Session, event: PageEvent) {
        match event {
            PageEvent::Response { tag, result } => match tag {
                RequestTag::CafeInfo => {
                    if let Some(info) = decode::<CafeInfo>(tag, result) {
                        Self::fill_cafe_info(ctx, info);
                    }
                }
                RequestTag::Categories => {
                    if let Some(categories) = decode::<Vec<Category>>(tag, result) {
                        Self::fill_categories(ctx, categories);
                    }
                }
                RequestTag::PopularMenu => {
                    if let Some(items) = decode::<Vec<CafeItem>>(tag, result) {
                        self.popular.fill(ctx, items);
                    }
                }
                other => debug!(tag = ?other, "Response not meant for the root page"),
            },
            PageEvent::CategorySelected(id) => ctx.navigate(CATEGORY, Some(PageParams::category(id))),
            PageEvent::ItemSelected(id) => ctx.navigate(DETAILS, Some(PageParams::menu_item(id))),
            PageEvent::StepperIncrement(id) => self.popular.change_quantity(ctx, &id, 1),
            PageEvent::StepperDecrement(id) => self.popular.change_quantity(ctx, &id, -1),
            PageEvent::AddToCart(id) => self.popular.add_to_cart(ctx, &id),
            PageEvent::MainButtonClicked => ctx.navigate(CART, None),
            other => debug!(event = ?other, "Event ignored by the root page"),
        }
    }
}
