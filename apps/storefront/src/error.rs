//! # Storefront Errors
//!
//! Error types for the storefront app and the user-facing notice they turn
//! into.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Backend task ── NetworkFailure ──► Completion ──► page handler        │
//! │                                                        │                │
//! │  Cart / Router ── CoreError ─────────────────┐         │                │
//! │                                              ▼         ▼                │
//! │  Config / I/O ── StorefrontError ─────► Notice { code, message }       │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                   snackbar (error / warning)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use cafe_core::{CartError, CoreError, RouteError, ValidationError};

/// Result type alias for storefront operations.
pub type StorefrontResult<T> = Result<T, StorefrontError>;

// =============================================================================
// Network Failure
// =============================================================================

/// Why a backend call did not produce a payload.
///
/// Cloneable so a single completion can be logged and handed to a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkFailure {
    /// The endpoint has nothing at this path (404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The backend answered with an error status.
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never got an answer.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The answer was not the JSON we expected.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl NetworkFailure {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        NetworkFailure::Status {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        NetworkFailure::NotFound {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for NetworkFailure {
    fn from(err: serde_json::Error) -> Self {
        NetworkFailure::Decode(err.to_string())
    }
}

// =============================================================================
// Storefront Error
// =============================================================================

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkFailure),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CartError> for StorefrontError {
    fn from(err: CartError) -> Self {
        StorefrontError::Core(err.into())
    }
}

impl From<RouteError> for StorefrontError {
    fn from(err: RouteError) -> Self {
        StorefrontError::Core(err.into())
    }
}

impl From<ValidationError> for StorefrontError {
    fn from(err: ValidationError) -> Self {
        StorefrontError::Core(err.into())
    }
}

impl From<toml::de::Error> for StorefrontError {
    fn from(err: toml::de::Error) -> Self {
        StorefrontError::Config(err.to_string())
    }
}

impl From<url::ParseError> for StorefrontError {
    fn from(err: url::ParseError) -> Self {
        StorefrontError::Config(format!("invalid URL: {}", err))
    }
}

// =============================================================================
// Notice
// =============================================================================

/// What the user is told when something fails.
///
/// ## Serialization
/// ```json
/// { "code": "NETWORK_ERROR", "message": "Something went wrong." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notice {
    pub code: NoticeCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum NoticeCode {
    /// Backend unreachable or answered with an error
    NetworkError,

    /// Form input rejected
    ValidationError,

    /// Cart mutation rejected
    CartError,

    /// Invoice was not paid
    PaymentError,

    /// Anything else
    Internal,
}

/// Shown for any failed backend call; the details only go to the log.
pub const GENERIC_NETWORK_MESSAGE: &str = "Something went wrong.";

impl Notice {
    pub fn new(code: NoticeCode, message: impl Into<String>) -> Self {
        Notice {
            code,
            message: message.into(),
        }
    }
}

impl From<&NetworkFailure> for Notice {
    fn from(err: &NetworkFailure) -> Self {
        tracing::warn!(error = %err, "Backend request failed");
        Notice::new(NoticeCode::NetworkError, GENERIC_NETWORK_MESSAGE)
    }
}

impl From<&StorefrontError> for Notice {
    fn from(err: &StorefrontError) -> Self {
        match err {
            StorefrontError::Network(failure) => Notice::from(failure),
            StorefrontError::Core(CoreError::Validation(e)) => {
                Notice::new(NoticeCode::ValidationError, e.to_string())
            }
            StorefrontError::Core(CoreError::Cart(e)) => {
                Notice::new(NoticeCode::CartError, e.to_string())
            }
            other => {
                tracing::error!(error = %other, "Internal storefront error");
                Notice::new(NoticeCode::Internal, "Internal error")
            }
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_failure_hides_details() {
        let failure = NetworkFailure::status(500, "Traceback ...");
        let notice = Notice::from(&failure);

        assert_eq!(notice.code, NoticeCode::NetworkError);
        assert_eq!(notice.message, GENERIC_NETWORK_MESSAGE);
    }

    #[test]
    fn test_validation_error_is_shown_verbatim() {
        let err: StorefrontError = ValidationError::Required {
            field: "phone".into(),
        }
        .into();
        let notice = Notice::from(&err);

        assert_eq!(notice.code, NoticeCode::ValidationError);
        assert_eq!(notice.message, "phone is required");
    }

    #[test]
    fn test_notice_serialization() {
        let notice = Notice::new(NoticeCode::PaymentError, "declined");
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["code"], "PAYMENT_ERROR");
        assert_eq!(json["message"], "declined");
    }

    #[test]
    fn test_route_error_converts() {
        let err: StorefrontError = RouteError::UnknownRoute("promo".into()).into();
        assert_eq!(err.to_string(), "Routing error: Unknown route: promo");
    }
}
