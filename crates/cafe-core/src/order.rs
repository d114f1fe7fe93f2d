//! # Order Payloads
//!
//! Everything that leaves the storefront when the user checks out.
//!
//! ## Checkout Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Paths                                   │
//! │                                                                         │
//! │  CheckoutForm { name, phone, payMethod }                                │
//! │        │                                                                │
//! │        ├── cash ──► CashOrder ──► platform data channel                 │
//! │        │                          (bot receives it, staff calls back)   │
//! │        │                                                                │
//! │        └── card ──► OrderRequest ──► POST /order                        │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                     OrderResponse { invoiceUrl, orderId }               │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                     openInvoice ──► InvoiceStatus                       │
//! │                                     paid │ failed │ cancelled │ pending │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend prices an invoice from the cart lines it receives: every line
//! becomes an [`InvoiceLine`] in minor units and a [`CompactCartEntry`] in
//! the stored order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartItem;
use crate::error::OrderError;
use crate::validation::{validate_customer_name, validate_phone, ValidationResult};

/// Currency used when the request does not name one.
pub const DEFAULT_CURRENCY: &str = "RUB";

// =============================================================================
// Checkout Form
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PayMethod {
    /// Paid on delivery; the order goes through the platform data channel.
    Cash,
    /// Paid online through a platform invoice.
    Card,
}

impl PayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayMethod::Cash => "cash",
            PayMethod::Card => "card",
        }
    }
}

/// Checkout form contents after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub pay_method: PayMethod,
}

impl CheckoutForm {
    /// Validates raw field values and builds the form.
    ///
    /// ## Errors
    /// The first failing field, name before phone.
    pub fn new(name: &str, phone: &str, pay_method: PayMethod) -> ValidationResult<Self> {
        Ok(CheckoutForm {
            name: validate_customer_name(name)?,
            phone: validate_phone(phone)?,
            pay_method,
        })
    }
}

/// Cash order sent through the platform data channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CashOrder {
    pub cart: Vec<CartItem>,
    pub name: String,
    pub phone: String,
    pub pay_method: PayMethod,
}

impl CashOrder {
    pub fn new(cart: &[CartItem], form: &CheckoutForm) -> Self {
        CashOrder {
            cart: cart.to_vec(),
            name: form.name.clone(),
            phone: form.phone.clone(),
            pay_method: form.pay_method,
        }
    }
}

// =============================================================================
// Online Order
// =============================================================================

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderRequest {
    /// Platform init data, checked by the backend.
    #[serde(rename = "_auth")]
    pub auth: String,

    pub cart_items: Vec<CartItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub form: Option<CheckoutForm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub currency: Option<String>,
}

impl OrderRequest {
    pub fn new(auth: impl Into<String>, cart_items: &[CartItem]) -> Self {
        OrderRequest {
            auth: auth.into(),
            cart_items: cart_items.to_vec(),
            form: None,
            currency: None,
        }
    }

    pub fn with_form(mut self, form: CheckoutForm) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Invoice lines for every cart item, in cart order.
    ///
    /// ## Errors
    /// `AmountOverflow` naming the first line whose amount does not fit.
    pub fn invoice_lines(&self, price_multiplier: i64) -> Result<Vec<InvoiceLine>, OrderError> {
        self.cart_items
            .iter()
            .map(|item| InvoiceLine::from_cart_item(item, price_multiplier))
            .collect()
    }

    /// Compact cart stored with the order.
    pub fn compact_cart(
        &self,
        price_multiplier: i64,
    ) -> Result<Vec<CompactCartEntry>, OrderError> {
        self.cart_items
            .iter()
            .map(|item| CompactCartEntry::from_cart_item(item, price_multiplier))
            .collect()
    }

    /// Invoice total in minor units.
    pub fn total_minor(&self, price_multiplier: i64) -> Result<i64, OrderError> {
        self.invoice_lines(price_multiplier)?
            .iter()
            .try_fold(0i64, |total, line| {
                total
                    .checked_add(line.amount)
                    .ok_or_else(|| OrderError::AmountOverflow {
                        label: "order total".to_string(),
                    })
            })
    }
}

/// Reply to `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderResponse {
    pub invoice_url: String,
    pub order_id: String,
}

/// One priced line on the platform invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceLine {
    /// `"{name} ({variant}) x{qty}"`
    pub label: String,
    /// Minor units: `cost * multiplier * qty`.
    pub amount: i64,
}

impl InvoiceLine {
    pub fn from_cart_item(item: &CartItem, price_multiplier: i64) -> Result<Self, OrderError> {
        let label = format!(
            "{} ({}) x{}",
            item.cafe_item.name, item.variant.name, item.quantity
        );
        let amount = item
            .variant
            .cost
            .checked_to_minor(price_multiplier)
            .and_then(|unit| unit.checked_mul(item.quantity));

        match amount {
            Some(amount) => Ok(InvoiceLine { label, amount }),
            None => Err(OrderError::AmountOverflow { label }),
        }
    }
}

/// Cart line as stored with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompactCartEntry {
    pub name: String,
    pub variant: String,
    pub qty: i64,
    pub price_minor: i64,
}

impl CompactCartEntry {
    pub fn from_cart_item(item: &CartItem, price_multiplier: i64) -> Result<Self, OrderError> {
        let price_minor = item
            .variant
            .cost
            .checked_to_minor(price_multiplier)
            .ok_or_else(|| OrderError::AmountOverflow {
                label: format!("{} ({})", item.cafe_item.name, item.variant.name),
            })?;

        Ok(CompactCartEntry {
            name: item.cafe_item.name.clone(),
            variant: item.variant.name.clone(),
            qty: item.quantity,
            price_minor,
        })
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Outcome reported by the platform when the invoice closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum InvoiceStatus {
    Paid,
    Failed,
    Cancelled,
    Pending,
}

impl InvoiceStatus {
    /// Parses the platform's status string. Anything unrecognized is treated
    /// as a cancellation.
    pub fn parse(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "paid" => InvoiceStatus::Paid,
            "failed" => InvoiceStatus::Failed,
            "pending" => InvoiceStatus::Pending,
            _ => InvoiceStatus::Cancelled,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, InvoiceStatus::Paid)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{CafeItem, Variant};

    fn line(name: &str, variant: &str, cost: i64, quantity: i64) -> CartItem {
        CartItem {
            cafe_item: CafeItem::new(name.to_lowercase(), name, vec![]),
            variant: Variant::new("1", variant, cost),
            quantity,
        }
    }

    #[test]
    fn test_invoice_lines_in_minor_units() {
        let request = OrderRequest::new(
            "query_id=1",
            &[line("Latte", "0.4 л", 250, 2), line("Croissant", "Classic", 180, 1)],
        );

        let lines = request.invoice_lines(100).unwrap();
        assert_eq!(lines[0].label, "Latte (0.4 л) x2");
        assert_eq!(lines[0].amount, 50_000);
        assert_eq!(lines[1].amount, 18_000);
        assert_eq!(request.total_minor(100), Ok(68_000));
    }

    #[test]
    fn test_compact_cart_keeps_unit_price() {
        let request = OrderRequest::new("auth", &[line("Latte", "M", 250, 3)]);
        let compact = request.compact_cart(100).unwrap();

        assert_eq!(compact[0].qty, 3);
        assert_eq!(compact[0].price_minor, 25_000);
        assert_eq!(
            serde_json::to_value(&compact[0]).unwrap()["price_minor"],
            25_000
        );
    }

    #[test]
    fn test_order_request_wire_shape() {
        let form = CheckoutForm::new("Анна", "+7 900 123 45 67", PayMethod::Card).unwrap();
        let request = OrderRequest::new("init-data", &[line("Tea", "Cup", 90, 1)]).with_form(form);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["_auth"], "init-data");
        assert_eq!(json["cartItems"][0]["quantity"], 1);
        assert_eq!(json["form"]["payMethod"], "card");
        assert!(json.get("currency").is_none());
        assert_eq!(request.currency(), "RUB");

        let request = request.with_currency("USD");
        assert_eq!(serde_json::to_value(&request).unwrap()["currency"], "USD");
    }

    #[test]
    fn test_order_request_without_optional_fields() {
        let request: OrderRequest =
            serde_json::from_str(r#"{ "_auth": "x", "cartItems": [] }"#).unwrap();
        assert!(request.form.is_none());
        assert_eq!(request.total_minor(100), Ok(0));
    }

    #[test]
    fn test_overflowing_amounts_are_rejected() {
        let huge = i64::MAX / 100 + 1;
        let request = OrderRequest::new("auth", &[line("Latte", "M", huge, 1)]);
        assert_eq!(
            request.total_minor(100),
            Err(OrderError::AmountOverflow {
                label: "Latte (M) x1".into()
            })
        );
        assert!(request.compact_cart(100).is_err());

        let request = OrderRequest::new("auth", &[line("Latte", "M", 250, i64::MAX / 1000)]);
        assert!(request.compact_cart(100).is_ok());
        assert!(request.invoice_lines(100).is_err());

        let half = i64::MAX / 200 + 1;
        let request = OrderRequest::new(
            "auth",
            &[line("Latte", "M", half, 1), line("Mocha", "L", half, 1)],
        );
        assert_eq!(request.invoice_lines(100).map(|l| l.len()), Ok(2));
        assert_eq!(
            request.total_minor(100),
            Err(OrderError::AmountOverflow {
                label: "order total".into()
            })
        );
    }

    #[test]
    fn test_checkout_form_validation() {
        assert!(matches!(
            CheckoutForm::new(" ", "89001234567", PayMethod::Cash),
            Err(ValidationError::Required { .. })
        ));
        assert!(CheckoutForm::new("Иван", "nope", PayMethod::Cash).is_err());

        let form = CheckoutForm::new(" Иван ", "89001234567", PayMethod::Cash).unwrap();
        assert_eq!(form.name, "Иван");
    }

    #[test]
    fn test_cash_order_shape() {
        let form = CheckoutForm::new("Иван", "89001234567", PayMethod::Cash).unwrap();
        let order = CashOrder::new(&[line("Tea", "Cup", 90, 2)], &form);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["payMethod"], "cash");
        assert_eq!(json["cart"][0]["variant"]["name"], "Cup");
        assert_eq!(json["phone"], "89001234567");
    }

    #[test]
    fn test_invoice_status_parsing_is_lenient() {
        assert_eq!(InvoiceStatus::parse("paid"), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::parse("failed"), InvoiceStatus::Failed);
        assert_eq!(InvoiceStatus::parse("pending"), InvoiceStatus::Pending);
        assert_eq!(InvoiceStatus::parse("cancelled"), InvoiceStatus::Cancelled);
        assert_eq!(InvoiceStatus::parse("whatever"), InvoiceStatus::Cancelled);
        assert!(InvoiceStatus::parse(" PAID ").is_paid());
    }

    #[test]
    fn test_order_response_from_backend() {
        let response: OrderResponse = serde_json::from_str(
            r#"{ "invoiceUrl": "https://t.me/$abc", "orderId": "0f3a9c2b11de" }"#,
        )
        .unwrap();
        assert_eq!(response.order_id.len(), 12);
    }
}
