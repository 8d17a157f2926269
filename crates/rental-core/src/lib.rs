//! # rental-core: Pure Business Logic for Car Rental
//!
//! Every rule of the booking workflow that can be stated without touching
//! storage lives here: the data model, money and pricing, input validation,
//! authorization predicates and the booking transition table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Car Rental Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation layer (not in this workspace)         │   │
//! │  │    Browse ──► Book ──► Approval queue ──► Booking history       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  rental-engine (services)                       │   │
//! │  │    BookingEngine, InventoryService, AccountService              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rental-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐ ┌──────────┐ │   │
//! │  │   │  types  │ │  money  │ │validation│ │ authz  │ │lifecycle │ │   │
//! │  │   │ User    │ │ Money   │ │ days     │ │ owner  │ │ Pending→ │ │   │
//! │  │   │ Car     │ │ pricing │ │ pickup   │ │ admin  │ │ Confirmed│ │   │
//! │  │   │ Booking │ │         │ │ drafts   │ │        │ │ Rejected │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └────────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Car, Booking, statuses)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Booking total calculation
//! - [`validation`] - Input validation
//! - [`authz`] - Who may mutate which car or booking
//! - [`lifecycle`] - Booking transition table
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rental_core::money::Money;
//! use rental_core::pricing::compute_total;
//!
//! let total = compute_total(Money::from_major(3500), 3).unwrap();
//! assert_eq!(total.to_string(), "₹10500.00");
//! ```

pub mod authz;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use lifecycle::BookingAction;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shortest rental the booking form accepts, in days.
pub const DEFAULT_MIN_RENTAL_DAYS: u32 = 1;

/// Longest rental the booking form accepts, in days.
pub const DEFAULT_MAX_RENTAL_DAYS: u32 = 30;

/// Upper bound on a car's seat count.
pub const MAX_SEATS: u32 = 20;

/// Longest accepted pickup place, in characters.
pub const MAX_PICKUP_PLACE_LEN: usize = 200;

/// Image reference used when a car has none.
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.png";

/// Generates an id for a new user, car or booking.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
