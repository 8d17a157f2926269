//! # Validation Module
//!
//! Input validation for booking requests, car drafts and signups.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation layer                                           │
//! │  ├── Spinner bounds, empty-field checks                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine entry points (Rust)                                   │
//! │  ├── Type validation (deserialization, Role/Status parsing)            │
//! │  └── THIS MODULE: business rule validation, before any read or write   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (username COLLATE NOCASE)                                  │
//! │  └── Foreign keys (bookings → cars, users)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rental_core::validation::{parse_pickup_date, validate_days, DayBounds};
//!
//! let days = validate_days(3, DayBounds::default()).unwrap();
//! assert_eq!(days, 3);
//!
//! assert!(parse_pickup_date("2024-01-01").is_ok());
//! ```

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::CarDraft;
use crate::{DEFAULT_MAX_RENTAL_DAYS, DEFAULT_MIN_RENTAL_DAYS, MAX_SEATS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Day Bounds
// =============================================================================

/// Inclusive bounds on the rental duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBounds {
    pub min: u32,
    pub max: u32,
}

impl DayBounds {
    pub const fn new(min: u32, max: u32) -> Self {
        DayBounds { min, max }
    }
}

impl Default for DayBounds {
    fn default() -> Self {
        DayBounds::new(DEFAULT_MIN_RENTAL_DAYS, DEFAULT_MAX_RENTAL_DAYS)
    }
}

// =============================================================================
// Booking Validators
// =============================================================================

/// Validates a rental duration.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must lie within `bounds` (default 1–30)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Book: No. of Days                                                      │
/// │                                                                         │
/// │  User enters days: 3                                                   │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_days(3, 1..=30) ← THIS FUNCTION                              │
/// │       │                                                                 │
/// │       ├── days <= 0? → Error: "days must be positive"                  │
/// │       ├── days > 30? → Error: "days must be between 1 and 30"          │
/// │       └── OK → price it and create a Pending booking                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_days(days: i64, bounds: DayBounds) -> ValidationResult<u32> {
    if days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "days".to_string(),
        });
    }

    if days < bounds.min as i64 || days > bounds.max as i64 {
        return Err(ValidationError::OutOfRange {
            field: "days".to_string(),
            min: bounds.min as i64,
            max: bounds.max as i64,
        });
    }

    Ok(days as u32)
}

/// Validates the free-text pickup place and returns it trimmed.
///
/// `max_len` is counted in characters; callers without configuration pass
/// [`crate::MAX_PICKUP_PLACE_LEN`].
pub fn validate_pickup_place(place: &str, max_len: usize) -> ValidationResult<String> {
    let place = require("pickup_place", place)?;

    if place.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field: "pickup_place".to_string(),
            max: max_len,
        });
    }

    Ok(place)
}

/// Parses a pickup date in `YYYY-MM-DD` form.
pub fn parse_pickup_date(date: &str) -> ValidationResult<NaiveDate> {
    let date = require("pickup_date", date)?;
    NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: "pickup_date".to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

/// Parses a pickup time in `HH:MM` (or `HH:MM:SS`) form.
pub fn parse_pickup_time(time: &str) -> ValidationResult<NaiveTime> {
    let time = require("pickup_time", time)?;
    NaiveTime::parse_from_str(&time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&time, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidFormat {
            field: "pickup_time".to_string(),
            reason: "expected HH:MM".to_string(),
        })
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a username and returns it trimmed.
///
/// ## Rules
/// - 3 to 50 characters after trimming
/// - No whitespace inside
pub fn validate_username(username: &str) -> ValidationResult<String> {
    let username = require("username", username)?;
    let len = username.chars().count();

    if len < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }

    if len > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(username)
}

// =============================================================================
// Car Validators
// =============================================================================

/// Validates a day rate.
///
/// ## Example
/// ```rust
/// use rental_core::money::Money;
/// use rental_core::validation::validate_price_per_day;
///
/// assert!(validate_price_per_day(Money::from_major(3500)).is_ok());
/// assert!(validate_price_per_day(Money::zero()).is_err());
/// ```
pub fn validate_price_per_day(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price_per_day".to_string(),
        });
    }

    Ok(())
}

pub fn validate_seats(seats: u32) -> ValidationResult<()> {
    if seats == 0 || seats > MAX_SEATS {
        return Err(ValidationError::OutOfRange {
            field: "seats".to_string(),
            min: 1,
            max: MAX_SEATS as i64,
        });
    }

    Ok(())
}

/// Validates a create/edit payload for a car.
pub fn validate_car_draft(draft: &CarDraft) -> ValidationResult<()> {
    let name = require("name", &draft.name)?;
    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    for (field, value) in [
        ("model", &draft.model),
        ("category", &draft.category),
        ("fuel_type", &draft.fuel_type),
        ("transmission", &draft.transmission),
    ] {
        if value.chars().count() > 50 {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: 50,
            });
        }
    }

    validate_seats(draft.seats)?;
    validate_price_per_day(draft.price_per_day)?;

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Trims `value`, failing with `Required` if nothing is left.
pub fn require(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
