//! # Money Module
//!
//! Provides the `Money` type and the currency formatting seam.
//!
//! ## Whole Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The menu prices every variant in WHOLE currency units (rubles).       │
//! │                                                                         │
//! │    variant.cost = 250      → "250 ₽"                                   │
//! │    cart total   = 2500     → "2 500 ₽"                                 │
//! │                                                                         │
//! │  Minor units (kopecks) only appear on the invoice, where the amount    │
//! │  is multiplied by the configured price multiplier (default 100).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::money::{CurrencyFormatter, Money, RubleFormatter};
//!
//! let price = Money::from_units(250);
//! let line = price.multiply_quantity(2);
//! assert_eq!(RubleFormatter::default().format(line), "500 ₽");
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: totals are never negative in practice
/// - **Saturating operators**: `+`, `*` and `Sum` clamp at the i64 bounds,
///   so display code never panics; invoice math uses the `checked_*`
///   variants and rejects overflow
/// - **Newtype serde**: serialized as a bare integer, the same shape the
///   backend uses for `variant.cost`; deserialized from `250` or `"250"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let unit_price = Money::from_units(250);
    /// assert_eq!(unit_price.multiply_quantity(3).units(), 750);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies money by a quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Converts to minor units for invoices.
    ///
    /// ## Example
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// // 250 ₽ → 25 000 kopecks
    /// assert_eq!(Money::from_units(250).to_minor(100), 25_000);
    /// ```
    #[inline]
    pub const fn to_minor(&self, multiplier: i64) -> i64 {
        self.0.saturating_mul(multiplier)
    }

    /// Converts to minor units, `None` on overflow.
    #[inline]
    pub const fn checked_to_minor(&self, multiplier: i64) -> Option<i64> {
        self.0.checked_mul(multiplier)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Menu JSON files are hand-edited and carry costs both as numbers and as
/// numeric strings.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Number(i64),
            Text(String),
        }

        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => Ok(Money(n)),
            RawAmount::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Money)
                .map_err(|_| serde::de::Error::custom(format!("invalid amount '{}'", s))),
        }
    }
}

/// Display shows the bare number of units.
///
/// ## Note
/// This is for logs. Use a [`CurrencyFormatter`] for anything the user sees.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Turns an amount into the string shown to the user.
///
/// The cart holds one of these; the storefront passes the formatter that
/// matches its configured currency. Plain closures work too, which keeps
/// tests short.
pub trait CurrencyFormatter {
    fn format(&self, amount: Money) -> String;
}

impl<F> CurrencyFormatter for F
where
    F: Fn(Money) -> String,
{
    fn format(&self, amount: Money) -> String {
        self(amount)
    }
}

/// ru-RU style formatter: digit groups of three separated by a no-break
/// space, no decimals, currency sign after the number.
///
/// ```text
///   0      → "0 ₽"
///   500    → "500 ₽"
///   2500   → "2 500 ₽"       (U+00A0 between 2 and 500)
///   125000 → "125 000 ₽"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubleFormatter {
    /// Separator between digit groups.
    pub group_separator: char,
    /// Sign appended after a regular space.
    pub symbol: String,
}

impl RubleFormatter {
    /// Creates a formatter with a custom sign (e.g. `"руб."`).
    pub fn with_symbol(symbol: impl Into<String>) -> Self {
        RubleFormatter {
            symbol: symbol.into(),
            ..Self::default()
        }
    }
}

impl Default for RubleFormatter {
    fn default() -> Self {
        RubleFormatter {
            group_separator: '\u{a0}',
            symbol: "₽".to_string(),
        }
    }
}

impl CurrencyFormatter for RubleFormatter {
    fn format(&self, amount: Money) -> String {
        let digits = amount.units().unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if amount.units() < 0 {
            grouped.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(ch);
        }
        format!("{} {}", grouped, self.symbol)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(250);

        assert_eq!((a + b).units(), 1250);
        assert_eq!((a - b).units(), 750);
        assert_eq!((b * 4).units(), 1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.units(), 1500);
    }

    #[test]
    fn test_ruble_formatter_grouping() {
        let fmt = RubleFormatter::default();
        assert_eq!(fmt.format(Money::zero()), "0 ₽");
        assert_eq!(fmt.format(Money::from_units(500)), "500 ₽");
        assert_eq!(fmt.format(Money::from_units(2500)), "2\u{a0}500 ₽");
        assert_eq!(fmt.format(Money::from_units(125_000)), "125\u{a0}000 ₽");
        assert_eq!(fmt.format(Money::from_units(1_000_000)), "1\u{a0}000\u{a0}000 ₽");
        assert_eq!(fmt.format(Money::from_units(-1500)), "-1\u{a0}500 ₽");
    }

    #[test]
    fn test_overflow_saturates_or_is_rejected() {
        let huge = Money::from_units(i64::MAX / 2 + 1);

        assert_eq!(huge.multiply_quantity(2).units(), i64::MAX);
        assert_eq!((huge + huge).units(), i64::MAX);
        let total: Money = vec![huge, huge, huge].into_iter().sum();
        assert_eq!(total.units(), i64::MAX);

        assert_eq!(huge.checked_multiply_quantity(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(huge.checked_to_minor(100), None);
        assert_eq!(
            Money::from_units(250).checked_multiply_quantity(2),
            Some(Money::from_units(500))
        );
        assert_eq!(Money::from_units(250).checked_to_minor(100), Some(25_000));

        let shown = RubleFormatter::default().format(huge.multiply_quantity(2));
        assert!(shown.ends_with(" ₽"));
    }

    #[test]
    fn test_custom_symbol() {
        let fmt = RubleFormatter::with_symbol("руб.");
        assert_eq!(fmt.format(Money::from_units(90)), "90 руб.");
    }

    #[test]
    fn test_closure_formatter() {
        let fmt = |m: Money| format!("${}", m.units());
        assert_eq!(fmt.format(Money::from_units(7)), "$7");
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_units(250)).unwrap();
        assert_eq!(json, "250");
        let back: Money = serde_json::from_str("99").unwrap();
        assert_eq!(back.units(), 99);
    }

    #[test]
    fn test_deserializes_numeric_strings() {
        let money: Money = serde_json::from_str(r#"" 520 ""#).unwrap();
        assert_eq!(money.units(), 520);
        assert!(serde_json::from_str::<Money>(r#""free""#).is_err());
        assert!(serde_json::from_str::<Money>("2.5").is_err());
    }

    #[test]
    fn test_typescript_binding_is_number() {
        assert_eq!(Money::inline(), "number");
    }
}
