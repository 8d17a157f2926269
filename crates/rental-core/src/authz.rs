//! # Authorization
//!
//! Pure predicates deciding who may mutate which car or booking.
//!
//! ```text
//! ┌───────────────────────┬─────────┬──────────────────────┬──────────┐
//! │ Operation             │  admin  │ seller               │  user    │
//! ├───────────────────────┼─────────┼──────────────────────┼──────────┤
//! │ add car               │   ✅    │ ✅ (owns it)         │   ❌     │
//! │ edit / delete car     │   ✅    │ ✅ if owner          │   ❌     │
//! │ set car status / sold │   ✅    │ ✅ if owner          │   ❌     │
//! │ request booking       │   ❌    │ ❌                   │   ✅     │
//! │ approve / reject      │   ✅    │ ✅ if owns the car   │   ❌     │
//! │ view booking          │   ✅    │ ✅ if owns the car   │ own only │
//! │ list accounts         │   ✅    │ ❌                   │   ❌     │
//! └───────────────────────┴─────────┴──────────────────────┴──────────┘
//! ```
//!
//! The `ensure_*` variants turn a negative answer into `CoreError::Forbidden`
//! and are called before any state is touched.

use crate::error::{CoreError, CoreResult};
use crate::types::{Booking, Car, Role, User};

pub fn can_edit_car(user: &User, car: &Car) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Seller => user.id == car.owner_id,
        Role::User => false,
    }
}

/// The booking is implied by `car`: callers pass the car the booking
/// references.
pub fn can_act_on_booking(user: &User, booking: &Booking, car: &Car) -> bool {
    debug_assert_eq!(booking.car_id, car.id);
    match user.role {
        Role::Admin => true,
        Role::Seller => user.id == car.owner_id,
        Role::User => false,
    }
}

pub fn can_create_car(user: &User) -> bool {
    matches!(user.role, Role::Admin | Role::Seller)
}

/// Only plain users request bookings.
pub fn can_request_booking(user: &User) -> bool {
    user.role == Role::User
}

pub fn can_view_booking(user: &User, booking: &Booking, car: &Car) -> bool {
    can_act_on_booking(user, booking, car) || user.id == booking.user_id
}

pub fn can_manage_users(user: &User) -> bool {
    user.role == Role::Admin
}

/// Whether `user` may own cars (listed as a car's `owner_id`).
pub fn can_own_cars(user: &User) -> bool {
    matches!(user.role, Role::Admin | Role::Seller)
}

// =============================================================================
// Guards
// =============================================================================

pub fn ensure_can_edit_car(user: &User, car: &Car) -> CoreResult<()> {
    if can_edit_car(user, car) {
        Ok(())
    } else {
        Err(CoreError::forbidden(&user.id, format!("edit car {}", car.id)))
    }
}

pub fn ensure_can_act_on_booking(
    user: &User,
    booking: &Booking,
    car: &Car,
    verb: &str,
) -> CoreResult<()> {
    if can_act_on_booking(user, booking, car) {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            &user.id,
            format!("{} booking {}", verb, booking.id),
        ))
    }
}

pub fn ensure_can_create_car(user: &User) -> CoreResult<()> {
    if can_create_car(user) {
        Ok(())
    } else {
        Err(CoreError::forbidden(&user.id, "add cars"))
    }
}

pub fn ensure_can_request_booking(user: &User) -> CoreResult<()> {
    if can_request_booking(user) {
        Ok(())
    } else {
        Err(CoreError::forbidden(&user.id, "request bookings"))
    }
}

pub fn ensure_can_view_booking(user: &User, booking: &Booking, car: &Car) -> CoreResult<()> {
    if can_view_booking(user, booking, car) {
        Ok(())
    } else {
        Err(CoreError::forbidden(&user.id, format!("view booking {}", booking.id)))
    }
}

pub fn ensure_can_manage_users(user: &User) -> CoreResult<()> {
    if can_manage_users(user) {
        Ok(())
    } else {
        Err(CoreError::forbidden(&user.id, "manage accounts"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
