//! # Booking Lifecycle
//!
//! The single transition table for bookings and the car-status side effect
//! each transition carries.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                     ┌──────────── approve ───────────► Confirmed        │
//! │                     │                                  (car → Rented)   │
//! │   create ──► Pending┤                                                   │
//! │                     │                                                   │
//! │                     └──────────── reject ────────────► Rejected         │
//! │                                                        (car unchanged)  │
//! │                                                                         │
//! │   Confirmed and Rejected are terminal. Re-booking means a new Booking. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A pending booking never reserves its car; only approval does.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Booking, BookingStatus, CarStatus};

/// A decision taken on a pending booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Approve,
    Reject,
}

impl BookingAction {
    /// Status the booking moves to.
    pub const fn target(&self) -> BookingStatus {
        match self {
            BookingAction::Approve => BookingStatus::Confirmed,
            BookingAction::Reject => BookingStatus::Rejected,
        }
    }

    /// Status the booked car moves to, if any.
    pub const fn car_effect(&self) -> Option<CarStatus> {
        match self {
            BookingAction::Approve => Some(CarStatus::Rented),
            BookingAction::Reject => None,
        }
    }

    /// Whether the car must still be `Available` for the action to proceed.
    pub const fn requires_available_car(&self) -> bool {
        matches!(self, BookingAction::Approve)
    }

    pub const fn verb(&self) -> &'static str {
        match self {
            BookingAction::Approve => "approve",
            BookingAction::Reject => "reject",
        }
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// The transition table.
pub const fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    matches!(
        (from, to),
        (BookingStatus::Pending, BookingStatus::Confirmed)
            | (BookingStatus::Pending, BookingStatus::Rejected)
    )
}

/// Checks that `action` is legal for the booking's current status and
/// returns the target status.
pub fn check_transition(booking: &Booking, action: BookingAction) -> CoreResult<BookingStatus> {
    let to = action.target();
    if can_transition(booking.status, to) {
        Ok(to)
    } else {
        Err(CoreError::InvalidTransition {
            booking_id: booking.id.clone(),
            from: booking.status,
            to,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: "B1".to_string(),
            car_id: "C001".to_string(),
            user_id: "U002".to_string(),
            pickup_place: "Downtown".to_string(),
            pickup_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            pickup_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            days: 3,
            total_price: Money::from_major(10500),
            status,
            created_at: Utc::now(),
            decided_at: None,
        }
    }

    #[test]
    fn test_transition_table() {
        use BookingStatus::*;
        assert!(can_transition(Pending, Confirmed));
        assert!(can_transition(Pending, Rejected));

        for from in [Confirmed, Rejected] {
            for to in [Pending, Confirmed, Rejected] {
                assert!(!can_transition(from, to), "{from} -> {to} must be refused");
            }
        }
        assert!(!can_transition(Pending, Pending));
    }

    #[test]
    fn test_check_transition_from_pending() {
        let b = booking(BookingStatus::Pending);
        assert_eq!(
            check_transition(&b, BookingAction::Approve).unwrap(),
            BookingStatus::Confirmed
        );
        assert_eq!(
            check_transition(&b, BookingAction::Reject).unwrap(),
            BookingStatus::Rejected
        );
    }

    #[test]
    fn test_double_approval_refused() {
        let b = booking(BookingStatus::Confirmed);
        let err = check_transition(&b, BookingAction::Approve).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                from: BookingStatus::Confirmed,
                to: BookingStatus::Confirmed,
                ..
            }
        ));
    }

    #[test]
    fn test_approve_after_reject_refused() {
        let b = booking(BookingStatus::Rejected);
        assert!(check_transition(&b, BookingAction::Approve).is_err());
        assert!(check_transition(&b, BookingAction::Reject).is_err());
    }

    #[test]
    fn test_car_effects() {
        assert_eq!(BookingAction::Approve.car_effect(), Some(CarStatus::Rented));
        assert_eq!(BookingAction::Reject.car_effect(), None);
        assert!(BookingAction::Approve.requires_available_car());
        assert!(!BookingAction::Reject.requires_available_car());
    }
}
