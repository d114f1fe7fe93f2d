//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAFE_API_BASE_URL=https://cafe.example/api                         │
//! │     CAFE_DATA_DIR=/srv/cafe/data                                       │
//! │     CAFE_BACKEND=http                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.cafe.storefront/... (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! backend = "local"        # or "http"
//! base_url = "https://cafe.example/api"
//! data_dir = "data"
//! invoice_base_url = "https://t.me/invoice"
//! price_multiplier = 100   # rubles -> kopecks
//!
//! [store]
//! currency = "RUB"
//! symbol = "₽"
//!
//! [checkout]
//! online_payments = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use cafe_core::{RubleFormatter, DEFAULT_PRICE_MULTIPLIER};

use crate::error::{StorefrontError, StorefrontResult};

// =============================================================================
// Sections
// =============================================================================

/// Which [`Backend`](crate::backend::Backend) answers the pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// JSON files under `data_dir`, orders kept in memory.
    #[default]
    Local,
    /// A remote cafe backend at `base_url`.
    Http,
}

impl std::str::FromStr for BackendKind {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "http" => Ok(BackendKind::Http),
            other => Err(StorefrontError::Config(format!("unknown backend: {}", other))),
        }
    }
}

/// Backend location and invoice pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub backend: BackendKind,

    /// Base every endpoint path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding `info.json`, `categories.json` and `menu/*.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base of the invoice links handed to the platform.
    #[serde(default = "default_invoice_base_url")]
    pub invoice_base_url: String,

    /// Minor units per currency unit.
    #[serde(default = "default_price_multiplier")]
    pub price_multiplier: i64,

    /// Per-request timeout of the HTTP backend.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_invoice_base_url() -> String {
    "https://t.me/invoice".to_string()
}

fn default_price_multiplier() -> i64 {
    DEFAULT_PRICE_MULTIPLIER
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            backend: BackendKind::default(),
            base_url: default_base_url(),
            data_dir: default_data_dir(),
            invoice_base_url: default_invoice_base_url(),
            price_multiplier: default_price_multiplier(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Currency shown to the user and sent with invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,
}

fn default_currency() -> String {
    cafe_core::order::DEFAULT_CURRENCY.to_string()
}

fn default_symbol() -> String {
    "₽".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            currency: default_currency(),
            symbol: default_symbol(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Card payments through platform invoices. When off, only cash orders
    /// are accepted.
    #[serde(default = "default_true")]
    pub online_payments: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            online_payments: true,
        }
    }
}

// =============================================================================
// Storefront Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StorefrontResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> StorefrontResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StorefrontResult<()> {
        let base = Url::parse(&self.api.base_url)?;
        if base.cannot_be_a_base() {
            return Err(StorefrontError::Config(format!(
                "base_url cannot be used as a base: {}",
                self.api.base_url
            )));
        }

        Url::parse(&self.api.invoice_base_url)?;

        if self.api.price_multiplier <= 0 {
            return Err(StorefrontError::Config(
                "price_multiplier must be greater than 0".into(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(StorefrontError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.store.currency.trim().is_empty() {
            return Err(StorefrontError::Config("currency must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `CAFE_*` overrides using `lookup` to read variables.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(kind) = lookup("CAFE_BACKEND") {
            match kind.parse::<BackendKind>() {
                Ok(kind) => self.api.backend = kind,
                Err(e) => warn!(error = %e, "Ignoring CAFE_BACKEND"),
            }
        }

        if let Some(url) = lookup("CAFE_API_BASE_URL") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = url;
        }

        if let Some(dir) = lookup("CAFE_DATA_DIR") {
            self.api.data_dir = PathBuf::from(dir);
        }

        if let Some(url) = lookup("CAFE_INVOICE_BASE_URL") {
            self.api.invoice_base_url = url;
        }

        if let Some(multiplier) = lookup("CAFE_PRICE_MULTIPLIER") {
            match multiplier.parse::<i64>() {
                Ok(m) => self.api.price_multiplier = m,
                Err(_) => warn!(value = %multiplier, "Ignoring non-numeric CAFE_PRICE_MULTIPLIER"),
            }
        }

        if let Some(currency) = lookup("CAFE_CURRENCY") {
            self.store.currency = currency;
        }

        if let Some(flag) = lookup("CAFE_ONLINE_PAYMENTS") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.checkout.online_payments = true,
                "0" | "false" | "no" | "off" => self.checkout.online_payments = false,
                _ => warn!(value = %flag, "Unknown CAFE_ONLINE_PAYMENTS value"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cafe", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Currency formatter matching the store settings.
    pub fn formatter(&self) -> RubleFormatter {
        RubleFormatter::with_symbol(self.store.symbol.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.backend, BackendKind::Local);
        assert_eq!(config.api.price_multiplier, 100);
        assert_eq!(config.store.currency, "RUB");
        assert!(config.checkout.online_payments);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StorefrontConfig::from_toml(
            r#"
            [api]
            backend = "http"
            base_url = "https://cafe.example/api/"
            price_multiplier = 1

            [checkout]
            online_payments = false
            "#,
        )
        .unwrap();

        assert_eq!(config.api.backend, BackendKind::Http);
        assert_eq!(config.api.base_url, "https://cafe.example/api/");
        assert_eq!(config.api.price_multiplier, 1);
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.api.data_dir, PathBuf::from("data"));
        assert_eq!(config.store.symbol, "₽");
        assert!(!config.checkout.online_payments);
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();

        config.api.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(StorefrontError::Config(_))));

        config.api.base_url = "https://cafe.example".into();
        config.api.price_multiplier = 0;
        assert!(config.validate().is_err());

        config.api.price_multiplier = 100;
        config.store.currency = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CAFE_API_BASE_URL", "https://override.example"),
            ("CAFE_PRICE_MULTIPLIER", "abc"),
            ("CAFE_ONLINE_PAYMENTS", "off"),
            ("CAFE_DATA_DIR", "/srv/cafe"),
            ("CAFE_BACKEND", "HTTP"),
        ]
        .into_iter()
        .collect();

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://override.example");
        assert_eq!(config.api.price_multiplier, 100);
        assert_eq!(config.api.data_dir, PathBuf::from("/srv/cafe"));
        assert_eq!(config.api.backend, BackendKind::Http);
        assert!(!config.checkout.online_payments);

        config.apply_overrides(|key| (key == "CAFE_BACKEND").then(|| "ftp".to_string()));
        assert_eq!(config.api.backend, BackendKind::Http);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[store]\nsymbol = \"руб.\"\n").unwrap();

        let config = StorefrontConfig::load(Some(path)).unwrap();

        assert_eq!(config.formatter().symbol, "руб.");
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        assert!(StorefrontConfig::load(Some(path.clone())).is_err());
        let config = StorefrontConfig::load_or_default(Some(path));

        assert_eq!(config, StorefrontConfig::default());
    }
}
