//! # Requests
//!
//! Fire-and-forget backend calls with a single completion path.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  page.load()                                                            │
//! │    └─ ctx.requests.get(Tag, "/menu/pizza")                              │
//! │          │                                                              │
//! │          ▼  tokio::spawn                                                │
//! │       backend.get_json().await ─► proxify_unsplash ─► Completion ──┐    │
//! │                                                                    │    │
//! │  Storefront::run_until_idle()  ◄──── mpsc::UnboundedReceiver ◄─────┘    │
//! │    ├─ completion.generation == router.generation → dispatch to page    │
//! │    └─ otherwise: page was left meanwhile, completion dropped           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every request is stamped with the generation of the view that issued it.
//! In-flight requests are never cancelled. Each request yields exactly one
//! completion: a call that panics completes as a transport failure.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::{proxify_unsplash, Backend};
use crate::error::NetworkFailure;

/// What a completion answers, so the page can route the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTag {
    CafeInfo,
    Categories,
    PopularMenu,
    CategoryMenu,
    ItemDetails,
    CreateOrder,
}

/// Outcome of one backend call.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Router generation of the view that issued the request.
    pub generation: u64,
    pub tag: RequestTag,
    pub result: Result<Value, NetworkFailure>,
}

enum Call {
    Get(String),
    Post(String, Value),
}

/// Spawns backend calls on behalf of the pages.
pub struct Requests {
    backend: Arc<dyn Backend>,
    tx: mpsc::UnboundedSender<Completion>,
    generation: u64,
    issued: u64,
}

impl Requests {
    /// Creates the spawner and the receiving end of its completions.
    pub fn channel(backend: Arc<dyn Backend>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let requests = Requests {
            backend,
            tx,
            generation: 0,
            issued: 0,
        };
        (requests, rx)
    }

    /// Generation stamped on requests issued from now on.
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Requests issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn get(&mut self, tag: RequestTag, path: impl Into<String>) {
        self.spawn(tag, Call::Get(path.into()));
    }

    pub fn post(&mut self, tag: RequestTag, path: impl Into<String>, body: Value) {
        self.spawn(tag, Call::Post(path.into(), body));
    }

    fn spawn(&mut self, tag: RequestTag, call: Call) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let generation = self.generation;
        self.issued += 1;

        let call = tokio::spawn(async move {
            match call {
                Call::Get(path) => {
                    debug!(?tag, path = %path, generation, "GET");
                    backend.get_json(&path).await
                }
                Call::Post(path, body) => {
                    debug!(?tag, path = %path, generation, "POST");
                    backend.post_json(&path, body).await
                }
            }
        });

        tokio::spawn(async move {
            let result = match call.await {
                Ok(result) => result.map(proxify_unsplash),
                Err(e) => {
                    warn!(?tag, generation, error = %e, "Request task failed");
                    Err(NetworkFailure::Transport(format!("request task failed: {}", e)))
                }
            };

            if tx
                .send(Completion {
                    generation,
                    tag,
                    result,
                })
                .is_err()
            {
                debug!(?tag, "Storefront gone, completion discarded");
            }
        });
    }
}
