//! # Money Module
//!
//! Provides the `Money` type for day rates and booking totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With f64 day rates:                                                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                             │
//! │    ₹3500.00/day = 350000 paise                                        │
//! │    × 3 days    = 1050000 paise = ₹10500.00 (exact)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rental_core::money::Money;
//!
//! let rate = Money::from_major(3500); // ₹3500.00
//! let total = rate.checked_multiply_days(3).unwrap();
//! assert_eq!(total, Money::from_major(10500));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor currency units (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: day rates are validated positive at the boundary
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **sqlx transparent**: stored as a plain INTEGER column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use rental_core::money::Money;
    ///
    /// let rate = Money::from_minor(350_000);
    /// assert_eq!(rate.minor(), 350_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// Day rates in the demo inventory are whole rupees (3500, 7000, ...).
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies a day rate by a number of days.
    ///
    /// Returns `None` on overflow instead of wrapping.
    ///
    /// ## User Workflow
    /// ```text
    /// Car: Toyota Camry ₹3500/day
    /// Days: 3
    ///      │
    ///      ▼
    /// checked_multiply_days(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Booking.total_price: ₹10500.00 (frozen)
    /// ```
    #[inline]
    pub const fn checked_multiply_days(&self, days: u32) -> Option<Self> {
        match self.0.checked_mul(days as i64) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display; the frontend owns localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major() {
        let money = Money::from_major(3500);
        assert_eq!(money.minor(), 350_000);
        assert_eq!(money.major(), 3500);
        assert_eq!(money.minor_part(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_major(10500).to_string(), "₹10500.00");
        assert_eq!(Money::from_minor(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_minor(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_checked_multiply_days() {
        let rate = Money::from_major(3500);
        assert_eq!(rate.checked_multiply_days(3), Some(Money::from_major(10500)));
        assert_eq!(rate.checked_multiply_days(0), Some(Money::zero()));

        let huge = Money::from_minor(i64::MAX / 2);
        assert_eq!(huge.checked_multiply_days(3), None);
    }

    #[test]
    fn test_sign_checks() {
        assert!(!Money::zero().is_positive());
        assert!(Money::from_minor(1).is_positive());
        assert!(!Money::from_minor(-1).is_positive());
    }
}
