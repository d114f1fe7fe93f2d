//! # Validation Module
//!
//! Input checks shared by the cart and checkout.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Page controller                                              │
//! │  └── Checkout form fields (validate_customer_name/phone)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart                                                         │
//! │  └── validate_quantity on every mutation (contract check)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── auth data + cart items checked before an invoice is issued        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CartError, ValidationError};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest name accepted on the checkout form.
pub const MAX_NAME_LEN: usize = 80;

/// Longest phone accepted on the checkout form (matches the backend column).
pub const MAX_PHONE_LEN: usize = 50;

// =============================================================================
// Quantities
// =============================================================================

/// Checks a cart quantity or delta.
///
/// The cart reports this as its own error kind rather than a
/// `ValidationError`, because reaching the cart with a bad quantity is a
/// caller bug.
///
/// ```rust
/// use cafe_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> Result<(), CartError> {
    if qty <= 0 {
        return Err(CartError::InvalidQuantity { quantity: qty });
    }
    Ok(())
}

// =============================================================================
// Checkout Form
// =============================================================================

/// Validates the customer's name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates the customer's phone number.
///
/// ## Rules
/// - Must not be blank
/// - Digits plus `+ ( ) - ` and spaces only
/// - At least 5 digits
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_phone;
///
/// assert_eq!(validate_phone(" +7 (900) 123-45-67 ").unwrap(), "+7 (900) 123-45-67");
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > MAX_PHONE_LEN {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LEN,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | '-' | ' '))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces and + ( ) -".to_string(),
        });
    }

    if phone.chars().filter(char::is_ascii_digit).count() < 5 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain at least 5 digits".to_string(),
        });
    }

    Ok(phone.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert_eq!(
            validate_quantity(-1),
            Err(CartError::InvalidQuantity { quantity: -1 })
        );
    }

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name("  Анна ").unwrap(), "Анна");
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"я".repeat(81)).is_err());
        assert!(validate_customer_name(&"я".repeat(80)).is_ok());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("89001234567").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12-3").is_err());
        assert!(validate_phone("+7 900 abc").is_err());
    }
}
