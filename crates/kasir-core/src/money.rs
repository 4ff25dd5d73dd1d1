//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Whole Currency Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prices are stored as whole currency units (Rupiah has no minor unit)  │
//! │                                                                         │
//! │    Indomie Goreng    price = 3500      (Rp 3.500)                      │
//! │    qty 3             subtotal = 10500  (Rp 10.500)                     │
//! │                                                                         │
//! │  All arithmetic on the checkout path is CHECKED: an overflowing        │
//! │  subtotal or total is an error, never a wrapped value.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_units(15_000);
//! let subtotal = price.checked_mul(2).unwrap();
//! let total = subtotal.checked_add(Money::from_units(9_000)).unwrap();
//! assert_eq!(total.units(), 39_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: matches the SQLite INTEGER column
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: serializes as a bare number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two values, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(3_000).checked_mul(3).unwrap().units(), 9_000);
    /// assert!(Money::from_units(i64::MAX).checked_mul(2).is_none());
    /// ```
    #[inline]
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }
}

/// Display format: `Rp 39.000` (dot as thousands separator).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, grouped)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<i64> for Money {
    fn from(units: i64) -> Self {
        Money(units)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(15_000);
        assert_eq!(money.units(), 15_000);
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_units(15_000);
        assert_eq!(price.checked_mul(2), Some(Money::from_units(30_000)));
        assert_eq!(
            price.checked_add(Money::from_units(9_000)),
            Some(Money::from_units(24_000))
        );
        assert_eq!(Money::from_units(i64::MAX).checked_add(Money::from_units(1)), None);
        assert_eq!(Money::from_units(i64::MAX / 2 + 1).checked_mul(2), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(0).to_string(), "Rp 0");
        assert_eq!(Money::from_units(500).to_string(), "Rp 500");
        assert_eq!(Money::from_units(39_000).to_string(), "Rp 39.000");
        assert_eq!(Money::from_units(1_250_000).to_string(), "Rp 1.250.000");
        assert_eq!(Money::from_units(-3_500).to_string(), "-Rp 3.500");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Money::from_units(39_000)).unwrap();
        assert_eq!(json, "39000");
    }
}
