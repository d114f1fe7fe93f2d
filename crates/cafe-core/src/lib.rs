//! # cafe-core: Pure Storefront Logic
//!
//! This crate holds the two stateful pieces of the cafe storefront, the
//! [`Cart`](cart::Cart) and the [`Router`](routing::Router), plus the plain
//! data they move around. Nothing in here touches the network, the platform
//! SDK or the screen.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cafe Storefront Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Chat-platform webview (markup + SDK)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ events / platform calls                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             apps/storefront (page controllers)                 │   │
//! │  │    MainPage, CategoryPage, DetailsPage, CartPage, Checkout     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   cart    │  │  routing  │  │   order   │  │   │
//! │  │   │   Money   │  │   Cart    │  │  Router   │  │  Request  │  │   │
//! │  │   │ Formatter │  │ CartItem  │  │  Route    │  │  Invoice  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO PLATFORM CALLS                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog payloads (CafeItem, Variant, Category, CafeInfo)
//! - [`money`] - Money type and the currency formatter seam
//! - [`cart`] - Cart and CartItem
//! - [`notify`] - Single-slot change listener used by the cart
//! - [`routing`] - Route contract and the navigation state machine
//! - [`order`] - Order/invoice payloads
//! - [`validation`] - Input checks shared by the cart and checkout
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::{Cart, CafeItem, Variant, RubleFormatter};
//!
//! let mut cart = Cart::new(RubleFormatter::default());
//! let latte = CafeItem::new("latte", "Latte", vec![Variant::new("m", "M", 250)]);
//!
//! cart.add_item(&latte, &latte.variants[0], 2).unwrap();
//! assert_eq!(cart.portion_count(), 2);
//! assert_eq!(cart.display_total_cost(), "500 ₽");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod notify;
pub mod order;
pub mod routing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartItemKey};
pub use error::{CartError, CoreError, CoreResult, OrderError, RouteError, ValidationError};
pub use money::{CurrencyFormatter, Money, RubleFormatter};
pub use notify::{ChangeNotifier, SingleSlot};
pub use order::{
    CashOrder, CheckoutForm, CompactCartEntry, InvoiceLine, InvoiceStatus, OrderRequest,
    OrderResponse, PayMethod,
};
pub use routing::{ActiveRoute, Route, RouteContext, Router};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name of the route the application starts on.
pub const ROOT_ROUTE: &str = "root";

/// Default number of minor units per currency unit on invoices
/// (rubles to kopecks).
pub const DEFAULT_PRICE_MULTIPLIER: i64 = 100;
