//! # Routing
//!
//! Single-page navigation: a registry of named routes and at most one active
//! route at a time.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Router States                                    │
//! │                                                                         │
//! │  ┌───────────────┐  navigate_to(n, p)   ┌──────────────────┐           │
//! │  │ NoActiveRoute │ ───────────────────► │ RouteActive(n)   │           │
//! │  └───────────────┘   mount n, n.load(p) └────────┬─────────┘           │
//! │                                                  │                      │
//! │                            navigate_to(m, p)     │  (m may equal n)     │
//! │                            r.close()             │                      │
//! │                            mount m, m.load(p)    ▼                      │
//! │                                         ┌──────────────────┐           │
//! │                                         │ RouteActive(m)   │           │
//! │                                         └──────────────────┘           │
//! │                                                                         │
//! │  navigate_to(unknown) → Err(UnknownRoute), state unchanged             │
//! │  close() of the old route returns before load() of the new one starts │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Context, Params, Events
//! The router is generic over three application types:
//! - `C`: the context passed to every hook (cart, platform, screen, ...).
//!   It must implement [`RouteContext`] so the router can swap views.
//! - `P`: the navigation parameter payload. It must be serializable; the
//!   router logs the JSON form, which is the same shape the webview used to
//!   pass between pages.
//! - `E`: events (clicks, network completions) forwarded to the active
//!   route through [`Router::dispatch`].
//!
//! Hooks receive `&mut C`, never the router itself. A route that wants to
//! navigate records the request in its context and the owner of the router
//! performs it after the hook returns.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::RouteError;

// =============================================================================
// Contracts
// =============================================================================

/// What the router needs from the application context.
pub trait RouteContext {
    /// Swaps the route's view into the display container. Called after the
    /// previous route closed and before the new route loads; `route` already
    /// carries the new generation.
    fn mount_view(&mut self, route: &ActiveRoute);
}

/// A named page controller with mount/unmount hooks.
pub trait Route<C, P, E = ()> {
    /// Unique name used for navigation.
    fn name(&self) -> &str;

    /// Markup fragment the page renders into.
    fn view_path(&self) -> &str;

    /// Called every time the route becomes active.
    fn load(&mut self, ctx: &mut C, params: Option<P>);

    /// Called when the route stops being active. Routes release anything
    /// they registered in `load` (cart listener, button handlers).
    fn close(&mut self, _ctx: &mut C) {}

    /// Receives an event while the route is active.
    fn handle(&mut self, _ctx: &mut C, _event: E) {}
}

/// Snapshot of the active route, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoute {
    pub name: String,
    pub view_path: String,
    /// Navigation counter value at the time the route was mounted.
    pub generation: u64,
}

// =============================================================================
// Router
// =============================================================================

/// Navigation state machine.
///
/// ## Invariants
/// - Route names are unique
/// - At most one route is active
/// - A failed navigation leaves the active route and generation untouched
pub struct Router<C, P, E = ()> {
    routes: Vec<Box<dyn Route<C, P, E>>>,
    active: Option<usize>,
    generation: u64,
}

impl<C, P, E> Router<C, P, E>
where
    C: RouteContext,
    P: Serialize,
{
    /// Creates a router with no routes and nothing active.
    pub fn new() -> Self {
        Router {
            routes: Vec::new(),
            active: None,
            generation: 0,
        }
    }

    /// Adds a route to the registry.
    ///
    /// ## Errors
    /// `DuplicateRoute` if the name is taken; the registry is unchanged.
    pub fn register(&mut self, route: impl Route<C, P, E> + 'static) -> Result<(), RouteError> {
        let name = route.name().to_string();
        if self.index_of(&name).is_some() {
            return Err(RouteError::DuplicateRoute(name));
        }

        debug!(route = %name, view = route.view_path(), "Route registered");
        self.routes.push(Box::new(route));
        Ok(())
    }

    /// Makes `name` the active route.
    ///
    /// ## Sequence
    /// 1. Look the route up (`UnknownRoute` if missing, nothing else happens)
    /// 2. Close the active route, if any, including when it is `name` itself
    /// 3. Mount the target's view through the context
    /// 4. Load the target with `params`
    pub fn navigate_to(&mut self, ctx: &mut C, name: &str, params: Option<P>) -> Result<(), RouteError> {
        let target = self
            .index_of(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;

        if let Some(current) = self.active.take() {
            let route = &mut self.routes[current];
            debug!(route = route.name(), "Closing route");
            route.close(ctx);
        }

        self.generation += 1;
        let route = &mut self.routes[target];
        ctx.mount_view(&ActiveRoute {
            name: route.name().to_string(),
            view_path: route.view_path().to_string(),
            generation: self.generation,
        });

        info!(
            route = route.name(),
            generation = self.generation,
            params = %params_json(&params),
            "Navigating"
        );
        route.load(ctx, params);
        self.active = Some(target);
        Ok(())
    }

    /// Forwards `event` to the active route. Returns `false` if no route is
    /// active.
    pub fn dispatch(&mut self, ctx: &mut C, event: E) -> bool {
        match self.active {
            Some(index) => {
                self.routes[index].handle(ctx, event);
                true
            }
            None => false,
        }
    }

    /// The active route, if any.
    pub fn active_route(&self) -> Option<ActiveRoute> {
        self.active.map(|index| {
            let route = &self.routes[index];
            ActiveRoute {
                name: route.name().to_string(),
                view_path: route.view_path().to_string(),
                generation: self.generation,
            }
        })
    }

    /// Name of the active route, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.map(|index| self.routes[index].name())
    }

    /// Number of successful navigations so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Registered route names, in registration order.
    pub fn route_names(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.name()).collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.name() == name)
    }
}

impl<C, P, E> Default for Router<C, P, E>
where
    C: RouteContext,
    P: Serialize,
{
    fn default() -> Self {
        Self::new()
    }
}

fn params_json<P: Serialize>(params: &Option<P>) -> String {
    match params {
        Some(p) => serde_json::to_string(p).unwrap_or_else(|_| "<unserializable>".to_string()),
        None => "null".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[derive(Default)]
    struct Ctx {
        log: Vec<String>,
    }

    impl RouteContext for Ctx {
        fn mount_view(&mut self, route: &ActiveRoute) {
            self.log
                .push(format!("mount:{}:{}", route.name, route.generation));
        }
    }

    struct LoggingRoute {
        name: &'static str,
    }

    impl Route<Ctx, Value, &'static str> for LoggingRoute {
        fn name(&self) -> &str {
            self.name
        }

        fn view_path(&self) -> &str {
            "/pages/logged.html"
        }

        fn load(&mut self, ctx: &mut Ctx, params: Option<Value>) {
            let params = params.map(|p| p.to_string()).unwrap_or_default();
            ctx.log.push(format!("load:{}:{}", self.name, params));
        }

        fn close(&mut self, ctx: &mut Ctx) {
            ctx.log.push(format!("close:{}", self.name));
        }

        fn handle(&mut self, ctx: &mut Ctx, event: &'static str) {
            ctx.log.push(format!("event:{}:{}", self.name, event));
        }
    }

    fn router() -> Router<Ctx, Value, &'static str> {
        let mut router = Router::new();
        router.register(LoggingRoute { name: "menu" }).unwrap();
        router.register(LoggingRoute { name: "cart" }).unwrap();
        router
    }

    #[test]
    fn test_initial_state_has_no_active_route() {
        let router = router();
        assert!(router.active_route().is_none());
        assert_eq!(router.generation(), 0);
        assert_eq!(router.route_names(), vec!["menu", "cart"]);
    }

    #[test]
    fn test_duplicate_route_is_rejected() {
        let mut router = router();
        let err = router.register(LoggingRoute { name: "cart" }).unwrap_err();
        assert_eq!(err, RouteError::DuplicateRoute("cart".into()));
        assert_eq!(router.route_names().len(), 2);
    }

    #[test]
    fn test_first_navigation_skips_close() {
        let mut router = router();
        let mut ctx = Ctx::default();

        router
            .navigate_to(&mut ctx, "menu", Some(json!({ "id": "pizza" })))
            .unwrap();

        assert_eq!(
            ctx.log,
            vec![
                "mount:menu:1",
                r#"load:menu:{"id":"pizza"}"#,
            ]
        );
        assert_eq!(router.active_name(), Some("menu"));
    }

    #[test]
    fn test_close_completes_before_next_load() {
        let mut router = router();
        let mut ctx = Ctx::default();

        router.navigate_to(&mut ctx, "menu", None).unwrap();
        ctx.log.clear();
        router.navigate_to(&mut ctx, "cart", None).unwrap();

        assert_eq!(
            ctx.log,
            vec!["close:menu", "mount:cart:2", "load:cart:"]
        );
        assert_eq!(router.generation(), 2);
    }

    #[test]
    fn test_unknown_route_leaves_state_unchanged() {
        let mut router = router();
        let mut ctx = Ctx::default();
        router.navigate_to(&mut ctx, "menu", None).unwrap();
        let before = router.active_route();
        ctx.log.clear();

        let err = router.navigate_to(&mut ctx, "details", None).unwrap_err();

        assert_eq!(err, RouteError::UnknownRoute("details".into()));
        assert_eq!(router.active_route(), before);
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn test_self_navigation_reruns_lifecycle() {
        let mut router = router();
        let mut ctx = Ctx::default();
        router.navigate_to(&mut ctx, "cart", None).unwrap();
        ctx.log.clear();

        router.navigate_to(&mut ctx, "cart", None).unwrap();

        assert_eq!(
            ctx.log,
            vec!["close:cart", "mount:cart:2", "load:cart:"]
        );
        assert_eq!(router.active_route().unwrap().generation, 2);
    }

    #[test]
    fn test_dispatch_reaches_only_active_route() {
        let mut router = router();
        let mut ctx = Ctx::default();

        assert!(!router.dispatch(&mut ctx, "tap"));
        router.navigate_to(&mut ctx, "cart", None).unwrap();
        ctx.log.clear();

        assert!(router.dispatch(&mut ctx, "tap"));
        assert_eq!(ctx.log, vec!["event:cart:tap"]);
    }
}
