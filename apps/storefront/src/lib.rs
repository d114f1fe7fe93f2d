//! # Cafe Storefront
//!
//! Page controllers and collaborators of the cafe storefront webview.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront Components                           │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Storefront    │  │  Pages         │  │  Screen                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • Router       │  │ • root         │  │ • text slots               ││
//! │  │ • Session      │  │ • category     │  │ • visibility / enabled     ││
//! │  │ • completions  │  │ • details      │  │ • keyed lists              ││
//! │  │                │  │ • cart         │  │ • snackbars                ││
//! │  │                │  │ • checkout     │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Collaborators                                │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  Platform    │  │  Backend     │  │  Config                  ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ main button  │  │ catalog      │  │ storefront.toml          ││  │
//! │  │  │ invoice      │  │ POST /order  │  │ CAFE_* overrides         ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (override `storefront.toml`):
//! - `CAFE_BACKEND` - `local` (JSON files, default) or `http`
//! - `CAFE_API_BASE_URL` - Backend base URL (default: http://localhost:8000)
//! - `CAFE_DATA_DIR` - Catalog JSON directory of the local backend
//! - `CAFE_INVOICE_BASE_URL` - Base of the invoice links it hands out
//! - `CAFE_PRICE_MULTIPLIER` - Minor units per currency unit (default: 100)
//! - `CAFE_CURRENCY` - Invoice currency (default: RUB)
//! - `CAFE_ONLINE_PAYMENTS` - Offer card payment at checkout (default: true)
//! - `RUST_LOG` - Log filter (default: `info,cafe_storefront=debug,cafe_core=debug`)

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod pages;
pub mod platform;
pub mod requests;
pub mod screen;

// Re-exports
pub use app::{Session, Storefront};
pub use backend::{Backend, HttpBackend, LocalBackend};
pub use config::{BackendKind, StorefrontConfig};
pub use error::{NetworkFailure, Notice, NoticeCode, StorefrontError, StorefrontResult};
pub use pages::{CheckoutInput, PageEvent, PageParams};
pub use platform::{Platform, RecordingPlatform};

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` wins over the default
/// filter. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cafe_storefront=debug,cafe_core=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
