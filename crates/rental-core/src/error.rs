//! # Error Types
//!
//! Domain-specific error types for rental-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rental-core errors (this file)                                        │
//! │  ├── CoreError        - Booking / inventory rule violations            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rental-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  rental-engine errors                                                  │
//! │  ├── StoreError       - EntityStore failures (wraps DbError)           │
//! │  └── EngineError      - CoreError | StoreError, mapped to ErrorCode    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (car id, booking id, ...)
//! 3. Errors are enum variants, never String
//! 4. Every variant is recoverable by the caller; nothing here panics

use thiserror::Error;

use crate::types::{BookingStatus, CarStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Booking and inventory rule violations.
///
/// Each variant corresponds to one of the error kinds the presentation layer
/// distinguishes: not found, not available, invalid input, forbidden,
/// invalid transition (plus the car-deletion guard).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A car, user or booking id does not resolve.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The car is not `Available`.
    ///
    /// ## User Workflow
    /// ```text
    /// Book C001 for 3 days
    ///      │
    ///      ▼
    /// C001.status == Rented
    ///      │
    ///      ▼
    /// NotAvailable { car_id: "C001", status: Rented }
    ///      │
    ///      ▼
    /// UI shows: "Car C001 is not available (Rented)"
    /// ```
    #[error("Car {car_id} is not available ({status})")]
    NotAvailable { car_id: String, status: CarStatus },

    /// The acting user may not perform the operation.
    #[error("User {user_id} is not allowed to {action}")]
    Forbidden { user_id: String, action: String },

    /// The booking is not in the source state the operation needs.
    ///
    /// Also returned when a concurrent transition won the race.
    #[error("Booking {booking_id} is {from}, cannot move to {to}")]
    InvalidTransition {
        booking_id: String,
        from: BookingStatus,
        to: BookingStatus,
    },

    /// The car is still referenced by bookings and cannot be deleted.
    #[error("Car {car_id} is referenced by {bookings} booking(s); mark it Sold instead")]
    CarInUse { car_id: String, bookings: usize },

    /// Invalid input (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Forbidden error.
    pub fn forbidden(user_id: impl Into<String>, action: impl Into<String>) -> Self {
        CoreError::Forbidden {
            user_id: user_id.into(),
            action: action.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when request data doesn't meet requirements and are raised
/// before any entity is read or written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable date, unknown role).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., username already taken).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
