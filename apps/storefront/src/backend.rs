//! # Backend
//!
//! The HTTP side of the storefront: catalog reads and order creation.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /info                  cafe header block        (info.json)      │
//! │  GET  /categories            category tiles           (categories.json)│
//! │  GET  /menu/{category}       items of a category      (menu/{id}.json) │
//! │  GET  /menu/details/{item}   one item, any category                     │
//! │  POST /order                 { _auth, cartItems, form? }                │
//! │                              → { invoiceUrl, orderId }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two implementations: [`LocalBackend`] answers from JSON files on disk,
//! [`HttpBackend`] talks to a remote cafe backend with `reqwest`.
//! [`from_config`] picks one from `api.backend`.
//!
//! Pages never call a [`Backend`] directly; they go through
//! [`Requests`](crate::requests::Requests), which runs the call on a tokio
//! task and rewrites image links with [`proxify_unsplash`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use cafe_core::{Category, CheckoutForm, CompactCartEntry, OrderRequest, OrderResponse};

use crate::config::{BackendKind, StorefrontConfig};
use crate::error::{NetworkFailure, StorefrontError, StorefrontResult};

/// Image host whose links are served through the `/u/` proxy.
pub const UNSPLASH_PREFIX: &str = "https://images.unsplash.com/";

/// Category searched first by `/menu/details/{id}`.
const POPULAR_CATEGORY: &str = "popular";

// =============================================================================
// Backend Trait
// =============================================================================

/// Transport to the cafe backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, NetworkFailure>;

    async fn post_json(&self, path: &str, body: Value) -> Result<Value, NetworkFailure>;
}

/// Builds the backend named by `api.backend`.
pub fn from_config(config: &StorefrontConfig) -> StorefrontResult<Arc<dyn Backend>> {
    info!(backend = ?config.api.backend, base_url = %config.api.base_url, "Selecting backend");
    let backend: Arc<dyn Backend> = match config.api.backend {
        BackendKind::Local => Arc::new(LocalBackend::new(config)?),
        BackendKind::Http => Arc::new(HttpBackend::new(config)?),
    };
    Ok(backend)
}

// =============================================================================
// URL Helpers
// =============================================================================

/// Joins an endpoint onto a base URL with exactly one slash between them.
///
/// ```text
///   ("https://cafe.example/api/", "/info") → https://cafe.example/api/info
///   ("https://cafe.example/api",  "info")  → https://cafe.example/api/info
///   ("https://cafe.example/api",  "")      → https://cafe.example/api/
/// ```
pub fn join_url(base: &str, endpoint: &str) -> Result<Url, NetworkFailure> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| NetworkFailure::Transport(format!("invalid URL {}: {}", joined, e)))
}

/// Rewrites every string under [`UNSPLASH_PREFIX`] to `/u/...`, at any
/// depth of the payload.
pub fn proxify_unsplash(value: Value) -> Value {
    match value {
        Value::String(s) => match s.strip_prefix(UNSPLASH_PREFIX) {
            Some(rest) => Value::String(format!("/u/{}", rest)),
            None => Value::String(s),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(proxify_unsplash).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, proxify_unsplash(v)))
                .collect(),
        ),
        other => other,
    }
}

// =============================================================================
// Local Backend
// =============================================================================

/// Order as kept by the [`LocalBackend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredOrder {
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub cart: Vec<CompactCartEntry>,
    pub form: Option<CheckoutForm>,
    pub currency: String,
    /// Invoice total in minor units.
    pub total_minor: i64,
}

/// Backend served from JSON files on disk, with orders kept in memory.
///
/// ## Data Directory Layout
/// ```text
/// data/
/// ├── info.json
/// ├── categories.json
/// └── menu/
///     ├── popular.json
///     ├── burgers.json
///     └── ...
/// ```
pub struct LocalBackend {
    base_url: Url,
    data_dir: PathBuf,
    invoice_base_url: String,
    price_multiplier: i64,
    orders: Mutex<HashMap<String, StoredOrder>>,
}

impl LocalBackend {
    pub fn new(config: &StorefrontConfig) -> StorefrontResult<Self> {
        Ok(LocalBackend {
            base_url: Url::parse(&config.api.base_url)?,
            data_dir: config.api.data_dir.clone(),
            invoice_base_url: config.api.invoice_base_url.clone(),
            price_multiplier: config.api.price_multiplier,
            orders: Mutex::new(HashMap::new()),
        })
    }

    /// Stored order by id.
    pub fn order(&self, order_id: &str) -> Option<StoredOrder> {
        self.orders
            .lock()
            .ok()
            .and_then(|orders| orders.get(order_id).cloned())
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().map(|orders| orders.len()).unwrap_or(0)
    }

    /// Path segments of `path` relative to the base URL.
    fn endpoint_segments(&self, path: &str) -> Result<Vec<String>, NetworkFailure> {
        let url = join_url(self.base_url.as_str(), path)?;
        let base_path = self.base_url.path().trim_end_matches('/');
        let relative = url.path().strip_prefix(base_path).unwrap_or(url.path());

        Ok(relative
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn category_menu(&self, category_id: &str) -> Result<Value, NetworkFailure> {
        if !is_safe_id(category_id) {
            return Err(not_found_category(category_id));
        }
        let path = self.data_dir.join("menu").join(format!("{}.json", category_id));
        read_json(&path, || not_found_category(category_id)).await
    }

    async fn menu_item_details(&self, item_id: &str) -> Result<Value, NetworkFailure> {
        let not_found = || NetworkFailure::not_found(format!("Could not find `{}` menu item.", item_id));

        let categories: Vec<Category> = match self.categories().await {
            Ok(value) => serde_json::from_value(value)?,
            Err(NetworkFailure::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };

        let category_ids = std::iter::once(POPULAR_CATEGORY.to_string())
            .chain(categories.into_iter().map(|c| c.id))
            .filter(|id| is_safe_id(id));

        for category_id in category_ids {
            let items = match self.category_menu(&category_id).await {
                Ok(Value::Array(items)) => items,
                Ok(_) | Err(NetworkFailure::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            if let Some(item) = items
                .into_iter()
                .find(|item| item.get("id").and_then(Value::as_str) == Some(item_id))
            {
                debug!(item_id, category_id = %category_id, "Menu item found");
                return Ok(item);
            }
        }

        Err(not_found())
    }

    async fn categories(&self) -> Result<Value, NetworkFailure> {
        read_json(&self.data_dir.join("categories.json"), || {
            NetworkFailure::not_found("Could not find categories list.")
        })
        .await
    }

    fn create_order(&self, body: Value) -> Result<Value, NetworkFailure> {
        let auth = body.get("_auth").and_then(Value::as_str).unwrap_or_default();
        if auth.trim().is_empty() {
            return Err(NetworkFailure::status(
                401,
                "Request data should contain valid auth data.",
            ));
        }
        if body.get("cartItems").is_none() {
            return Err(NetworkFailure::status(400, "Cart Items are not provided."));
        }

        let request: OrderRequest = serde_json::from_value(body)
            .map_err(|e| NetworkFailure::status(400, format!("Malformed order: {}", e)))?;
        if request.cart_items.is_empty() {
            return Err(NetworkFailure::status(400, "Cart is empty."));
        }

        let priced = request
            .compact_cart(self.price_multiplier)
            .and_then(|cart| Ok((cart, request.total_minor(self.price_multiplier)?)));
        let (cart, total_minor) = match priced {
            Ok(priced) => priced,
            Err(e) => {
                warn!(error = %e, "Order rejected");
                return Err(NetworkFailure::status(400, e.to_string()));
            }
        };

        let order_id: String = Uuid::new_v4().simple().to_string().chars().take(12).collect();
        let order = StoredOrder {
            order_id: order_id.clone(),
            created_at: Utc::now(),
            cart,
            form: request.form.clone(),
            currency: request.currency().to_string(),
            total_minor,
        };

        info!(
            order_id = %order_id,
            lines = order.cart.len(),
            total_minor = order.total_minor,
            currency = %order.currency,
            "Order stored"
        );

        self.orders
            .lock()
            .map_err(|_| NetworkFailure::Transport("order store unavailable".into()))?
            .insert(order_id.clone(), order);

        let invoice_url = join_url(&self.invoice_base_url, &order_id)?;
        Ok(serde_json::to_value(OrderResponse {
            invoice_url: invoice_url.to_string(),
            order_id,
        })?)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    #[instrument(skip(self))]
    async fn get_json(&self, path: &str) -> Result<Value, NetworkFailure> {
        let segments = self.endpoint_segments(path)?;
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            ["info"] => {
                read_json(&self.data_dir.join("info.json"), || {
                    NetworkFailure::not_found("Could not find cafe information.")
                })
                .await
            }
            ["categories"] => self.categories().await,
            ["menu", "details", item_id] => self.menu_item_details(item_id).await,
            ["menu", category_id] => self.category_menu(category_id).await,
            _ => Err(NetworkFailure::not_found(format!("No endpoint at {}", path))),
        }
    }

    #[instrument(skip(self, body))]
    async fn post_json(&self, path: &str, body: Value) -> Result<Value, NetworkFailure> {
        let segments = self.endpoint_segments(path)?;
        match segments.as_slice() {
            [endpoint] if endpoint == "order" => self.create_order(body),
            _ => Err(NetworkFailure::not_found(format!("No endpoint at {}", path))),
        }
    }
}

// =============================================================================
// HTTP Backend
// =============================================================================

/// Backend reached over HTTP at `api.base_url`.
///
/// Error answers carry `{ "message": "..." }`; a 404 becomes
/// [`NetworkFailure::NotFound`], any other non-2xx a
/// [`NetworkFailure::Status`].
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &StorefrontConfig) -> StorefrontResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .map_err(|e| StorefrontError::Config(format!("http client: {}", e)))?;

        Ok(HttpBackend {
            client,
            base_url: Url::parse(&config.api.base_url)?,
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, NetworkFailure> {
        join_url(self.base_url.as_str(), path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, NetworkFailure> {
        let response = request
            .send()
            .await
            .map_err(|e| NetworkFailure::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkFailure::Transport(format!("read body failed: {}", e)))?;

        if (200..300).contains(&status) {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(failure_from_status(status, &body))
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip(self))]
    async fn get_json(&self, path: &str) -> Result<Value, NetworkFailure> {
        let url = self.endpoint(path)?;
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self, body))]
    async fn post_json(&self, path: &str, body: Value) -> Result<Value, NetworkFailure> {
        let url = self.endpoint(path)?;
        self.send(self.client.post(url).json(&body)).await
    }
}

/// Turns a non-2xx answer into a [`NetworkFailure`], keeping the backend's
/// `message` when it sent one.
pub fn failure_from_status(status: u16, body: &str) -> NetworkFailure {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if status == 404 {
        NetworkFailure::not_found(message)
    } else {
        NetworkFailure::status(status, message)
    }
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn not_found_category(category_id: &str) -> NetworkFailure {
    NetworkFailure::not_found(format!("Could not find `{}` category data.", category_id))
}

async fn read_json(
    path: &Path,
    not_found: impl FnOnce() -> NetworkFailure,
) -> Result<Value, NetworkFailure> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
            NetworkFailure::status(500, format!("Broken data file {}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
        Err(e) => Err(NetworkFailure::Transport(e.to_string())),
    }
}
