//! Checkout page: customer form, pay method and the two order paths.
//!
//! ```text
//!   SubmitOrder ─► validate ─┬─ cash ─► send_data(CashOrder) ─► alert
//!                            │                       AlertDismissed ─► clear + close
//!                            └─ card ─► POST /order ─► open_invoice(url)
//!                                                   InvoiceClosed(paid) ─► clear + close
//! ```

use serde_json::Value;
use tracing::{debug, error, info, warn};

use cafe_core::{
    CashOrder, CheckoutForm, CurrencyFormatter, InvoiceStatus, OrderRequest, OrderResponse,
    PayMethod, Route,
};

use super::{CheckoutInput, PageEvent, PageParams, CHECKOUT};
use crate::app::Session;
use crate::error::{NetworkFailure, Notice, NoticeCode, GENERIC_NETWORK_MESSAGE};
use crate::requests::RequestTag;
use crate::screen::SnackbarKind;

const SUBMIT_BUTTON: &str = "checkout-submit";

pub const CASH_ORDER_SENT: &str = "Заказ отправлен, мы свяжемся с вами!";
pub const PAYMENT_FAILED: &str = "Что-то пошло не так, платеж не прошёл :(";
pub const ORDER_CANCELLED: &str = "Заказ был отменён.";
pub const EMPTY_CART: &str = "Корзина пуста.";
pub const CARD_UNAVAILABLE: &str = "Оплата картой сейчас недоступна.";

/// What the page is waiting for after a submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Pending {
    #[default]
    None,
    /// `POST /order` in flight.
    Order,
    /// Invoice sheet open.
    Invoice { order_id: String },
    /// Cash confirmation alert open.
    Alert,
}

#[derive(Debug, Default)]
pub struct CheckoutPage {
    pending: Pending,
}

impl CheckoutPage {
    fn submit(&mut self, ctx: &mut Session, input: CheckoutInput) {
        if self.pending != Pending::None {
            debug!(pending = ?self.pending, "Submit ignored while an order is pending");
            return;
        }
        if ctx.cart.is_empty() {
            ctx.show_snackbar(EMPTY_CART, SnackbarKind::Warning);
            return;
        }

        let form = match CheckoutForm::new(&input.name, &input.phone, input.pay_method) {
            Ok(form) => form,
            Err(e) => {
                debug!(error = %e, "Checkout form rejected");
                ctx.show_notice(&Notice::new(NoticeCode::ValidationError, e.to_string()));
                return;
            }
        };

        match form.pay_method {
            PayMethod::Cash => self.send_cash_order(ctx, &form),
            PayMethod::Card => self.create_invoice(ctx, form),
        }
    }

    fn send_cash_order(&mut self, ctx: &mut Session, form: &CheckoutForm) {
        let order = CashOrder::new(ctx.cart.items(), form);
        let payload = match serde_json::to_string(&order) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to encode cash order");
                ctx.show_notice(&Notice::new(NoticeCode::Internal, GENERIC_NETWORK_MESSAGE));
                return;
            }
        };

        info!(lines = order.cart.len(), "Sending cash order");
        ctx.platform.send_data(&payload);
        ctx.platform.show_alert(CASH_ORDER_SENT);
        self.pending = Pending::Alert;
    }

    fn create_invoice(&mut self, ctx: &mut Session, form: CheckoutForm) {
        if !ctx.config.checkout.online_payments {
            ctx.show_snackbar(CARD_UNAVAILABLE, SnackbarKind::Warning);
            return;
        }

        let request = OrderRequest::new(ctx.platform.init_data(), ctx.cart.items())
            .with_form(form)
            .with_currency(ctx.config.store.currency.clone());
        let body = match serde_json::to_value(&request) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to encode order request");
                ctx.show_notice(&Notice::new(NoticeCode::Internal, GENERIC_NETWORK_MESSAGE));
                return;
            }
        };

        info!(
            lines = request.cart_items.len(),
            currency = request.currency(),
            "Creating order"
        );
        ctx.screen.borrow_mut().set_enabled(SUBMIT_BUTTON, false);
        ctx.requests.post(RequestTag::CreateOrder, "/order", body);
        self.pending = Pending::Order;
    }

    fn order_created(&mut self, ctx: &mut Session, result: Result<Value, NetworkFailure>) {
        let response = result
            .and_then(|value| serde_json::from_value::<OrderResponse>(value).map_err(Into::into));

        match response {
            Ok(order) => {
                info!(order_id = %order.order_id, "Opening invoice");
                ctx.platform.open_invoice(&order.invoice_url);
                self.pending = Pending::Invoice {
                    order_id: order.order_id,
                };
            }
            Err(e) => {
                warn!(error = %e, "Order creation failed");
                ctx.show_notice(&Notice::from(&e));
                self.reopen(ctx);
            }
        }
    }

    fn invoice_closed(&mut self, ctx: &mut Session, status: InvoiceStatus) {
        let order_id = match std::mem::take(&mut self.pending) {
            Pending::Invoice { order_id } => order_id,
            other => {
                debug!(pending = ?other, ?status, "Invoice status without an open invoice");
                self.pending = other;
                return;
            }
        };

        info!(%order_id, ?status, "Invoice outcome");
        match status {
            InvoiceStatus::Paid => Self::finish(ctx),
            InvoiceStatus::Failed => {
                ctx.show_notice(&Notice::new(NoticeCode::PaymentError, PAYMENT_FAILED));
                self.reopen(ctx);
            }
            InvoiceStatus::Cancelled | InvoiceStatus::Pending => {
                ctx.show_snackbar(ORDER_CANCELLED, SnackbarKind::Warning);
                self.reopen(ctx);
            }
        }
    }

    fn alert_dismissed(&mut self, ctx: &mut Session) {
        if self.pending != Pending::Alert {
            debug!(pending = ?self.pending, "Alert dismissed without a cash order");
            return;
        }
        self.pending = Pending::None;
        Self::finish(ctx);
    }

    /// Lets the customer submit again.
    fn reopen(&mut self, ctx: &mut Session) {
        self.pending = Pending::None;
        let enabled = !ctx.cart.is_empty();
        ctx.screen.borrow_mut().set_enabled(SUBMIT_BUTTON, enabled);
    }

    /// The order is placed: empty the cart and close the webview.
    fn finish(ctx: &mut Session) {
        ctx.cart.clear();
        ctx.platform.close();
    }
}

impl Route<Session, PageParams, PageEvent> for CheckoutPage {
    fn name(&self) -> &str {
        CHECKOUT
    }

    fn view_path(&self) -> &str {
        "/pages/checkout.html"
    }

    fn load(&mut self, ctx: &mut Session, _params: Option<PageParams>) {
        self.pending = Pending::None;
        ctx.platform.expand();

        let total = ctx.formatter().format(ctx.cart.total_cost());
        let mut screen = ctx.screen.borrow_mut();
        screen.set_text("checkout-total", total);
        screen.set_enabled(SUBMIT_BUTTON, !ctx.cart.is_empty());
        screen.set_visible("pay-method-card", ctx.config.checkout.online_payments);
    }

    fn handle(&mut self, ctx: &mut Session, event: PageEvent) {
        match event {
            PageEvent::SubmitOrder(input) => self.submit(ctx, input),
            PageEvent::Response {
                tag: RequestTag::CreateOrder,
                result,
            } => self.order_created(ctx, result),
            PageEvent::InvoiceClosed(status) => self.invoice_closed(ctx, status),
            PageEvent::AlertDismissed => self.alert_dismissed(ctx),
            other => debug!(event = ?other, "Event ignored by the checkout page"),
        }
    }
}
