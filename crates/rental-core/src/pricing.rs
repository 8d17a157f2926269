//! # Pricing Calculator
//!
//! `total = day rate × days`, in exact minor units. The result is frozen on
//! the booking; nothing recomputes it later.

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

/// Computes a booking total.
///
/// ## Example
/// ```rust
/// use rental_core::money::Money;
/// use rental_core::pricing::compute_total;
///
/// let total = compute_total(Money::from_major(3500), 3).unwrap();
/// assert_eq!(total, Money::from_major(10500));
/// ```
pub fn compute_total(price_per_day: Money, days: u32) -> CoreResult<Money> {
    price_per_day.checked_multiply_days(days).ok_or_else(|| {
        ValidationError::OutOfRange {
            field: "total_price".to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_linear_in_days() {
        let rate = Money::from_major(3200);
        for days in 1..=30 {
            let total = compute_total(rate, days).unwrap();
            assert_eq!(total.minor(), rate.minor() * days as i64);
        }
    }

    #[test]
    fn test_fractional_rate_is_exact() {
        let rate = Money::from_minor(199_999);
        let total = compute_total(rate, 7).unwrap();
        assert_eq!(total.minor(), 1_399_993);
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let err = compute_total(Money::from_minor(i64::MAX), 2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
