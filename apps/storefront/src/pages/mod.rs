//! # Page Controllers
//!
//! One [`Route`](cafe_core::Route) per screen of the storefront.
//!
//! ## Navigation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   root ──(category tile)──► category ──(item)──► details               │
//! │    │  └──────────(item)────────────────────────►    │                  │
//! │    │                                                │ main button:     │
//! │    │ main button: "МОЯ КОРЗИНА • N ПОЗИЦИИ"         │ add + back root  │
//! │    ▼                                                ▼                  │
//! │   cart ──(checkout button)──► checkout ──► cash: send data + alert     │
//! │                                        └─► card: /order + invoice      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pages never navigate from inside a hook. They call
//! [`Session::navigate`], and the storefront performs the transition once
//! the hook has returned.

mod cart;
mod category;
mod checkout;
mod details;
mod main;
mod menu;

pub use cart::{render_cart, CartPage};
pub use category::CategoryPage;
pub use checkout::{
    CheckoutPage, CARD_UNAVAILABLE, CASH_ORDER_SENT, EMPTY_CART, ORDER_CANCELLED, PAYMENT_FAILED,
};
pub use details::DetailsPage;
pub use main::MainPage;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use cafe_core::{CartItemKey, InvoiceStatus, PayMethod, Router};

use crate::app::Session;
use crate::error::{NetworkFailure, StorefrontResult};
use crate::requests::RequestTag;

/// Route names.
pub const ROOT: &str = cafe_core::ROOT_ROUTE;
pub const CATEGORY: &str = "category";
pub const DETAILS: &str = "details";
pub const CART: &str = "cart";
pub const CHECKOUT: &str = "checkout";

/// Snackbar shown after a list item went into the cart.
pub const ADDED_TO_CART: &str = "Товар добавлен в корзину";

pub type PageRouter = Router<Session, PageParams, PageEvent>;

// =============================================================================
// Params & Events
// =============================================================================

/// Navigation parameters. Serialized form is `{"id": "..."}` for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageParams {
    Category { id: String },
    MenuItem { id: String },
}

impl PageParams {
    pub fn category(id: impl Into<String>) -> Self {
        PageParams::Category { id: id.into() }
    }

    pub fn menu_item(id: impl Into<String>) -> Self {
        PageParams::MenuItem { id: id.into() }
    }
}

/// Raw checkout form contents, validated by the checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutInput {
    pub name: String,
    pub phone: String,
    pub pay_method: PayMethod,
}

/// Everything a page can be told while it is active.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A backend call issued by this page finished.
    Response {
        tag: RequestTag,
        result: Result<Value, NetworkFailure>,
    },
    CategorySelected(String),
    ItemSelected(String),
    StepperIncrement(String),
    StepperDecrement(String),
    AddToCart(String),
    VariantSelected(String),
    CartIncrement(CartItemKey),
    CartDecrement(CartItemKey),
    CheckoutRequested,
    MainButtonClicked,
    SubmitOrder(CheckoutInput),
    InvoiceClosed(InvoiceStatus),
    AlertDismissed,
}

// =============================================================================
// Registration
// =============================================================================

/// Registers every page with `router`.
pub fn register_all(router: &mut PageRouter) -> StorefrontResult<()> {
    router.register(MainPage::default())?;
    router.register(CategoryPage::default())?;
    router.register(DetailsPage::default())?;
    router.register(CartPage)?;
    router.register(CheckoutPage::default())?;
    Ok(())
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// `"МОЯ КОРЗИНА • 1 ПОЗИЦИЯ"`, `"МОЯ КОРЗИНА • 3 ПОЗИЦИИ"`.
pub fn cart_button_label(portions: i64) -> String {
    let noun = if portions == 1 { "ПОЗИЦИЯ" } else { "ПОЗИЦИИ" };
    format!("МОЯ КОРЗИНА • {} {}", portions, noun)
}

/// Shows the cart button while the cart has portions, hides it otherwise.
pub(crate) fn refresh_cart_button(ctx: &mut Session) {
    let portions = ctx.cart.portion_count();
    if portions > 0 {
        ctx.platform.show_main_button(&cart_button_label(portions));
    } else {
        ctx.platform.hide_main_button();
    }
}

/// Decodes a catalog response. Failures are logged and yield `None`; catalog
/// sections simply stay as placeholders.
pub(crate) fn decode<T: DeserializeOwned>(
    tag: RequestTag,
    result: Result<Value, NetworkFailure>,
) -> Option<T> {
    match result.and_then(|value| serde_json::from_value(value).map_err(NetworkFailure::from)) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(?tag, error = %e, "Catalog request failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_button_label_plural() {
        assert_eq!(cart_button_label(1), "МОЯ КОРЗИНА • 1 ПОЗИЦИЯ");
        assert_eq!(cart_button_label(2), "МОЯ КОРЗИНА • 2 ПОЗИЦИИ");
        assert_eq!(cart_button_label(11), "МОЯ КОРЗИНА • 11 ПОЗИЦИИ");
    }

    #[test]
    fn test_params_serialize_as_id_object() {
        let json = serde_json::to_string(&PageParams::category("pizza")).unwrap();
        assert_eq!(json, r#"{"id":"pizza"}"#);
        let json = serde_json::to_string(&PageParams::menu_item("latte")).unwrap();
        assert_eq!(json, r#"{"id":"latte"}"#);
    }

    #[test]
    fn test_decode_failure_yields_none() {
        let ok: Option<Vec<String>> =
            decode(RequestTag::Categories, Ok(serde_json::json!(["a"])));
        assert_eq!(ok.unwrap(), vec!["a"]);

        let wrong_shape: Option<Vec<String>> =
            decode(RequestTag::Categories, Ok(serde_json::json!({ "a": 1 })));
        assert!(wrong_shape.is_none());

        let failed: Option<Vec<String>> = decode(
            RequestTag::Categories,
            Err(NetworkFailure::Transport("offline".into())),
        );
        assert!(failed.is_none());
    }
}
