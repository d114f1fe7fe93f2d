//! # Storefront
//!
//! Owns the router, the session context handed to every page, and the
//! receiving end of the request channel.
//!
//! ## Event Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Event Flow                             │
//! │                                                                         │
//! │  host input                 Storefront                  pages           │
//! │  ──────────                 ──────────                  ─────           │
//! │  tap / form  ──► send(event) ──────────► router.dispatch ──► handle()  │
//! │  main button ──► click_main_button() ──┘                     │         │
//! │  invoice     ──► invoice_closed(status) ┘                    │         │
//! │                                                              ▼         │
//! │                  flush_navigation() ◄─── session.navigate(route, p)    │
//! │                        │                                               │
//! │                        ▼                                               │
//! │                  router.navigate_to ──► close ► mount ► load           │
//! │                                                                         │
//! │  backend task ──► Completion ──► run_until_idle()                       │
//! │                                   ├─ current generation ► dispatch     │
//! │                                   └─ older generation   ► dropped      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use cafe_core::{ActiveRoute, Cart, InvoiceStatus, RouteContext, RubleFormatter, ROOT_ROUTE};

use crate::backend::Backend;
use crate::config::StorefrontConfig;
use crate::error::{Notice, StorefrontResult};
use crate::pages::{self, PageEvent, PageParams, PageRouter};
use crate::platform::Platform;
use crate::requests::{Completion, Requests};
use crate::screen::{Screen, SnackbarKind};

// =============================================================================
// Session
// =============================================================================

/// Navigation requested by a page, performed after its hook returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub route: String,
    pub params: Option<PageParams>,
}

/// Everything the pages work with.
///
/// The screen is shared with the cart listener closure installed by the
/// cart page, hence the `Rc<RefCell<_>>`.
pub struct Session {
    pub cart: Cart,
    pub platform: Box<dyn Platform>,
    pub screen: Rc<RefCell<Screen>>,
    pub requests: Requests,
    pub config: StorefrontConfig,
    formatter: RubleFormatter,
    navigation: VecDeque<NavigationRequest>,
}

impl Session {
    /// Queues a navigation.
    pub fn navigate(&mut self, route: &str, params: Option<PageParams>) {
        debug!(route, "Navigation requested");
        self.navigation.push_back(NavigationRequest {
            route: route.to_string(),
            params,
        });
    }

    pub fn formatter(&self) -> &RubleFormatter {
        &self.formatter
    }

    pub fn show_snackbar(&self, message: impl Into<String>, kind: SnackbarKind) {
        self.screen.borrow_mut().show_snackbar(message, kind);
    }

    /// Shows a notice as an error snackbar.
    pub fn show_notice(&self, notice: &Notice) {
        self.show_snackbar(notice.message.clone(), SnackbarKind::Error);
    }

    fn take_navigation(&mut self) -> Option<NavigationRequest> {
        self.navigation.pop_front()
    }

    fn clear_navigation(&mut self) -> usize {
        let dropped = self.navigation.len();
        self.navigation.clear();
        dropped
    }
}

impl RouteContext for Session {
    /// Mounting resets the main button; the incoming page decides its own.
    fn mount_view(&mut self, route: &ActiveRoute) {
        self.platform.hide_main_button();
        self.requests.set_generation(route.generation);
        self.screen.borrow_mut().mount(route);
    }
}

// =============================================================================
// Storefront
// =============================================================================

pub struct Storefront {
    router: PageRouter,
    session: Session,
    completions: mpsc::UnboundedReceiver<Completion>,
    received: u64,
}

impl Storefront {
    /// Wires the collaborators and registers every page. Nothing is mounted
    /// until [`Storefront::start`].
    pub fn new(
        config: StorefrontConfig,
        backend: Arc<dyn Backend>,
        platform: Box<dyn Platform>,
    ) -> StorefrontResult<Self> {
        let formatter = config.formatter();
        let (requests, completions) = Requests::channel(backend);

        let mut router = PageRouter::new();
        pages::register_all(&mut router)?;
        info!(routes = ?router.route_names(), "Storefront ready");

        Ok(Storefront {
            router,
            session: Session {
                cart: Cart::new(formatter.clone()),
                platform,
                screen: Rc::new(RefCell::new(Screen::new())),
                requests,
                config,
                formatter,
                navigation: VecDeque::new(),
            },
            completions,
            received: 0,
        })
    }

    /// Mounts the root page.
    pub fn start(&mut self) -> StorefrontResult<()> {
        self.navigate(ROOT_ROUTE, None)
    }

    pub fn navigate(&mut self, route: &str, params: Option<PageParams>) -> StorefrontResult<()> {
        self.router.navigate_to(&mut self.session, route, params)?;
        self.flush_navigation()
    }

    /// Delivers a UI event to the active page. Returns `false` when no page
    /// is active.
    pub fn send(&mut self, event: PageEvent) -> StorefrontResult<bool> {
        let delivered = self.router.dispatch(&mut self.session, event);
        self.flush_navigation()?;
        Ok(delivered)
    }

    /// Main button click. Ignored while the button is hidden.
    pub fn click_main_button(&mut self) -> StorefrontResult<bool> {
        if !self.session.platform.main_button().visible {
            debug!("Main button click ignored: button hidden");
            return Ok(false);
        }
        self.send(PageEvent::MainButtonClicked)
    }

    /// Invoice sheet closed with the platform's status string.
    pub fn invoice_closed(&mut self, status: &str) -> StorefrontResult<bool> {
        let status = InvoiceStatus::parse(status);
        info!(?status, "Invoice closed");
        self.send(PageEvent::InvoiceClosed(status))
    }

    pub fn alert_dismissed(&mut self) -> StorefrontResult<bool> {
        self.send(PageEvent::AlertDismissed)
    }

    /// Requests issued but not yet delivered.
    pub fn in_flight(&self) -> u64 {
        self.session.requests.issued() - self.received
    }

    /// Waits for every in-flight request and delivers the completions.
    ///
    /// ## Returns
    /// How many completions reached a page.
    pub async fn run_until_idle(&mut self) -> StorefrontResult<usize> {
        let mut delivered = 0;
        while self.in_flight() > 0 {
            let Some(completion) = self.completions.recv().await else {
                break;
            };
            self.received += 1;
            if self.deliver(completion)? {
                delivered += 1;
            }
        }
        Ok(delivered)
    }

    fn deliver(&mut self, completion: Completion) -> StorefrontResult<bool> {
        let current = self.router.generation();
        if completion.generation != current {
            debug!(
                tag = ?completion.tag,
                issued_at = completion.generation,
                current,
                "Dropping stale response"
            );
            return Ok(false);
        }

        self.send(PageEvent::Response {
            tag: completion.tag,
            result: completion.result,
        })
    }

    /// Performs queued navigations in order. A failed navigation drops the
    /// rest of the queue.
    fn flush_navigation(&mut self) -> StorefrontResult<()> {
        while let Some(request) = self.session.take_navigation() {
            if let Err(e) = self
                .router
                .navigate_to(&mut self.session, &request.route, request.params)
            {
                let dropped = self.session.clear_navigation();
                warn!(route = %request.route, dropped, error = %e, "Navigation failed");
                return Err(e.into());
            }
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.session.cart
    }

    pub fn screen(&self) -> Ref<'_, Screen> {
        self.session.screen.borrow()
    }

    pub fn active_route(&self) -> Option<ActiveRoute> {
        self.router.active_route()
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.session.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NetworkFailure, StorefrontError};
    use crate::platform::RecordingPlatform;
    use async_trait::async_trait;
    use cafe_core::{CoreError, RouteError};
    use serde_json::Value;

    struct OfflineBackend;

    #[async_trait]
    impl Backend for OfflineBackend {
        async fn get_json(&self, _path: &str) -> Result<Value, NetworkFailure> {
            Err(NetworkFailure::Transport("offline".into()))
        }

        async fn post_json(&self, _path: &str, _body: Value) -> Result<Value, NetworkFailure> {
            Err(NetworkFailure::Transport("offline".into()))
        }
    }

    fn storefront() -> Storefront {
        Storefront::new(
            StorefrontConfig::default(),
            Arc::new(OfflineBackend),
            Box::new(RecordingPlatform::new("query_id=1")),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_navigation_drops_the_queue() {
        let mut storefront = storefront();
        storefront.session.navigate("promo", None);
        storefront.session.navigate(pages::CART, None);

        let err = storefront.flush_navigation().unwrap_err();

        assert!(matches!(
            err,
            StorefrontError::Core(CoreError::Route(RouteError::UnknownRoute(ref name))) if name == "promo"
        ));
        assert!(storefront.session.navigation.is_empty());
        assert!(storefront.active_route().is_none());

        storefront.start().unwrap();
        assert_eq!(storefront.active_route().unwrap().name, ROOT_ROUTE);
        storefront.run_until_idle().await.unwrap();
        assert_eq!(storefront.in_flight(), 0);
    }
}
