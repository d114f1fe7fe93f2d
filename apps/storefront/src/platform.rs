//! # Platform Bridge
//!
//! The chat platform's webview SDK, as seen by the pages.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Platform Calls                                       │
//! │                                                                         │
//! │  Page                       Platform               Comes back as       │
//! │  ────                       ────────               ─────────────       │
//! │  show_main_button(label) ─► button on screen ────► MainButtonClicked   │
//! │  open_invoice(url) ───────► payment sheet ───────► InvoiceClosed       │
//! │  show_alert(text) ────────► modal alert ─────────► AlertDismissed      │
//! │  send_data(json) ─────────► bot receives order    (webview closes)     │
//! │  impact_occurred(light) ──► haptic tick                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callbacks never reach into the pages directly. The host reports them to
//! the [`Storefront`](crate::app::Storefront), which dispatches a page event
//! to whichever route is active at that moment.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};

/// Haptic feedback strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticStyle {
    Light,
    Medium,
    Heavy,
}

/// Main action button at the bottom of the webview.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MainButton {
    pub label: String,
    pub visible: bool,
}

impl MainButton {
    pub fn shown(label: impl Into<String>) -> Self {
        MainButton {
            label: label.into(),
            visible: true,
        }
    }

    pub fn hidden() -> Self {
        MainButton::default()
    }
}

/// Webview SDK operations used by the pages.
pub trait Platform {
    /// Signed init data, forwarded to the backend as `_auth`.
    fn init_data(&self) -> String;

    /// Expands the webview to full height.
    fn expand(&mut self);

    fn impact_occurred(&mut self, style: HapticStyle);

    /// Shows the main button with `label`. Clicks arrive as
    /// `MainButtonClicked` for the active page.
    fn show_main_button(&mut self, label: &str);

    fn hide_main_button(&mut self);

    fn main_button(&self) -> MainButton;

    /// Opens the payment sheet; the outcome arrives as `InvoiceClosed`.
    fn open_invoice(&mut self, url: &str);

    /// Shows a modal alert; dismissal arrives as `AlertDismissed`.
    fn show_alert(&mut self, message: &str);

    /// Sends a payload to the bot through the platform data channel.
    fn send_data(&mut self, data: &str);

    /// Closes the webview.
    fn close(&mut self);
}

// =============================================================================
// Recording Platform
// =============================================================================

/// Everything a [`RecordingPlatform`] was asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformLog {
    pub main_button: MainButton,
    pub expanded: bool,
    pub haptics: Vec<HapticStyle>,
    pub invoices: Vec<String>,
    pub alerts: Vec<String>,
    pub sent_data: Vec<String>,
    pub closed: bool,
}

/// In-memory platform for the headless driver and tests.
///
/// Clones share one log, so a test can keep a handle while the storefront
/// owns the boxed platform.
#[derive(Debug, Clone)]
pub struct RecordingPlatform {
    init_data: String,
    log: Rc<RefCell<PlatformLog>>,
}

impl RecordingPlatform {
    pub fn new(init_data: impl Into<String>) -> Self {
        RecordingPlatform {
            init_data: init_data.into(),
            log: Rc::new(RefCell::new(PlatformLog::default())),
        }
    }

    /// Copy of the log as it is now.
    pub fn snapshot(&self) -> PlatformLog {
        self.log.borrow().clone()
    }

    /// Last payload sent through the data channel, parsed as JSON.
    pub fn last_sent_json(&self) -> Option<serde_json::Value> {
        self.log
            .borrow()
            .sent_data
            .last()
            .and_then(|data| serde_json::from_str(data).ok())
    }
}

impl Platform for RecordingPlatform {
    fn init_data(&self) -> String {
        self.init_data.clone()
    }

    fn expand(&mut self) {
        debug!("Platform: expand");
        self.log.borrow_mut().expanded = true;
    }

    fn impact_occurred(&mut self, style: HapticStyle) {
        debug!(?style, "Platform: haptic impact");
        self.log.borrow_mut().haptics.push(style);
    }

    fn show_main_button(&mut self, label: &str) {
        debug!(label, "Platform: show main button");
        self.log.borrow_mut().main_button = MainButton::shown(label);
    }

    fn hide_main_button(&mut self) {
        debug!("Platform: hide main button");
        self.log.borrow_mut().main_button = MainButton::hidden();
    }

    fn main_button(&self) -> MainButton {
        self.log.borrow().main_button.clone()
    }

    fn open_invoice(&mut self, url: &str) {
        info!(url, "Platform: open invoice");
        self.log.borrow_mut().invoices.push(url.to_string());
    }

    fn show_alert(&mut self, message: &str) {
        info!(message, "Platform: alert");
        self.log.borrow_mut().alerts.push(message.to_string());
    }

    fn send_data(&mut self, data: &str) {
        info!(bytes = data.len(), "Platform: send data");
        self.log.borrow_mut().sent_data.push(data.to_string());
    }

    fn close(&mut self) {
        info!("Platform: close webview");
        self.log.borrow_mut().closed = true;
    }
}
