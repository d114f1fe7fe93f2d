//! # Error Types
//!
//! Domain-specific error types for cafe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cafe-core errors (this file)                                          │
//! │  ├── CartError        - Malformed cart mutations                        │
//! │  ├── RouteError       - Navigation contract violations                  │
//! │  ├── ValidationError  - Input validation failures                       │
//! │  ├── OrderError       - Invoice amounts out of range                    │
//! │  └── CoreError        - Umbrella for the above                          │
//! │                                                                         │
//! │  storefront errors (app crate)                                         │
//! │  └── StorefrontError  - Network, config, I/O + wrapped CoreError        │
//! │                                                                         │
//! │  Flow: CartError/RouteError → CoreError → StorefrontError → Notice     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are caused by the outside world. They are programmer or
//! input errors, reported to the immediate caller and never retried.

use thiserror::Error;

// =============================================================================
// Cart Error
// =============================================================================

/// Errors raised by [`Cart`](crate::cart::Cart) mutations.
///
/// A failed mutation leaves the cart exactly as it was and does not fire the
/// change listener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity or delta was zero or negative.
    #[error("Invalid quantity {quantity}: must be a positive integer")]
    InvalidQuantity { quantity: i64 },

    /// Increase/decrease referenced a line that is not in the cart.
    ///
    /// ## When This Occurs
    /// - The line was already removed by a previous decrease
    /// - The cart was cleared after the caller captured the item
    #[error("Item {item_id} (variant {variant_id}) is not in the cart")]
    ItemNotInCart { item_id: String, variant_id: String },

    /// The line's quantity would exceed `i64::MAX`.
    #[error("Quantity of {item_id} (variant {variant_id}) is too large")]
    QuantityOverflow { item_id: String, variant_id: String },
}

// =============================================================================
// Order Error
// =============================================================================

/// Errors raised while pricing an order in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// A line amount or the order total does not fit in `i64`.
    #[error("Order amount overflows for {label}")]
    AmountOverflow { label: String },
}

// =============================================================================
// Route Error
// =============================================================================

/// Errors raised by the [`Router`](crate::routing::Router).
///
/// The router's state is untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Navigation target was never registered.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// A route with the same name is already registered.
    #[error("Route '{0}' is already registered")]
    DuplicateRoute(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs (checkout form).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. a phone number with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that drive both the cart and the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error("Routing error: {0}")]
    Route(#[from] RouteError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
