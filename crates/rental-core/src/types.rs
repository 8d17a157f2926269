//! # Domain Types
//!
//! Core domain types used throughout the rental workspace.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │       Car       │   │     Booking     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  owner_id (FK)  │◄──│  car_id (FK)    │       │
//! │  │  username       │   │  price_per_day  │   │  user_id (FK)   │       │
//! │  │  role           │   │  status         │   │  days           │       │
//! │  └─────────────────┘   └─────────────────┘   │  total_price    │       │
//! │                                               │  status         │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   └─────────────────┘       │
//! │  │      Role       │   │   CarStatus     │   ┌─────────────────┐       │
//! │  │  Admin          │   │   Available     │   │ BookingStatus   │       │
//! │  │  Seller         │   │   Rented        │   │   Pending       │       │
//! │  │  User           │   │   Sold          │   │   Confirmed     │       │
//! │  └─────────────────┘   └─────────────────┘   │   Rejected      │       │
//! │                                               └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Closed Enums
//! Roles and statuses are parsed from text only at the boundary
//! (`FromStr`, serde, sqlx). Core logic matches on variants, never strings.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::PLACEHOLDER_IMAGE;

// =============================================================================
// Role
// =============================================================================

/// The role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages every car, booking and account.
    Admin,
    /// Lists cars and approves bookings on the cars they own.
    Seller,
    /// Browses cars and requests bookings.
    User,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boundary parsing: accepts any casing ("Seller", "ADMIN").
impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "seller" => Ok(Role::Seller),
            "user" => Ok(Role::User),
            other => Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
                reason: format!("unknown role '{}', expected admin, seller or user", other),
            }),
        }
    }
}

// =============================================================================
// Car Status
// =============================================================================

/// Availability of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum CarStatus {
    /// Can be requested.
    #[default]
    Available,
    /// Reserved by a confirmed booking.
    Rented,
    /// Retired by its owner.
    Sold,
}

impl CarStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "Available",
            CarStatus::Rented => "Rented",
            CarStatus::Sold => "Sold",
        }
    }

    #[inline]
    pub const fn is_available(&self) -> bool {
        matches!(self, CarStatus::Available)
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(CarStatus::Available),
            "rented" => Ok(CarStatus::Rented),
            "sold" => Ok(CarStatus::Sold),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown car status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle state of a booking.
///
/// `Pending → {Confirmed, Rejected}`; both targets are terminal.
/// The transition table lives in [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum BookingStatus {
    /// Awaiting a decision from the car's owner or an admin.
    #[default]
    Pending,
    /// Approved; the car is Rented.
    Confirmed,
    /// Declined; the car is untouched.
    Rejected,
}

impl BookingStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Rejected => "Rejected",
        }
    }

    /// Terminal states accept no further transitions.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "rejected" => Ok(BookingStatus::Rejected),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown booking status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A user account. Credentials live with the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,

    /// Unique, compared case-insensitively.
    pub username: String,

    pub role: Role,

    /// Phone number or office address shown to the other party of a booking.
    pub contact: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Signup payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub username: String,
    pub role: Role,
    pub contact: Option<String>,
}

// =============================================================================
// Car
// =============================================================================

/// A rentable car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Car {
    pub id: String,
    pub name: String,
    pub model: String,
    pub category: String,
    pub fuel_type: String,
    pub seats: u32,
    pub transmission: String,

    /// Day rate in minor units.
    pub price_per_day: Money,

    pub status: CarStatus,

    /// Seller (or admin) who listed the car.
    pub owner_id: String,

    /// Opaque reference to an externally stored image.
    pub image_path: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// Image reference to render, falling back to the placeholder.
    pub fn image_or_placeholder(&self) -> &str {
        match self.image_path.as_deref() {
            Some(path) if !path.trim().is_empty() => path,
            _ => PLACEHOLDER_IMAGE,
        }
    }
}

/// Descriptive fields for creating or editing a car.
///
/// Status is deliberately absent: new cars start `Available` and later
/// changes go through the status operations.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CarDraft {
    pub name: String,
    pub model: String,
    pub category: String,
    pub fuel_type: String,
    pub seats: u32,
    pub transmission: String,
    pub price_per_day: Money,
    pub image_path: Option<String>,

    /// Only honoured for admins; sellers always own what they list.
    pub owner_id: Option<String>,
}

/// Optional filters for car listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarFilter {
    pub owner_id: Option<String>,
    pub status: Option<CarStatus>,
}

impl CarFilter {
    pub fn owned_by(owner_id: impl Into<String>) -> Self {
        CarFilter {
            owner_id: Some(owner_id.into()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: CarStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, car: &Car) -> bool {
        self.owner_id.as_deref().map_or(true, |o| o == car.owner_id)
            && self.status.map_or(true, |s| s == car.status)
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A rental request for one car by one user.
///
/// `total_price` is frozen at creation: later day-rate edits on the car
/// never touch existing bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    pub id: String,
    pub car_id: String,
    pub user_id: String,
    pub pickup_place: String,

    #[ts(as = "String")]
    pub pickup_date: NaiveDate,

    #[ts(as = "String")]
    pub pickup_time: NaiveTime,

    pub days: u32,

    /// days × day rate at creation time.
    pub total_price: Money,

    pub status: BookingStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the booking was confirmed or rejected.
    #[ts(as = "Option<String>")]
    pub decided_at: Option<DateTime<Utc>>,
}

/// Raw booking request as collected by the presentation layer.
///
/// Date and time arrive as text (`2024-01-01`, `10:00`) and days as a signed
/// integer so that zero and negative input can be reported as invalid input.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingRequest {
    pub car_id: String,
    pub user_id: String,
    pub pickup_place: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub days: i64,
}

impl BookingRequest {
    pub fn new(
        car_id: impl Into<String>,
        user_id: impl Into<String>,
        pickup_place: impl Into<String>,
        pickup_date: impl Into<String>,
        pickup_time: impl Into<String>,
        days: i64,
    ) -> Self {
        BookingRequest {
            car_id: car_id.into(),
            user_id: user_id.into(),
            pickup_place: pickup_place.into(),
            pickup_date: pickup_date.into(),
            pickup_time: pickup_time.into(),
            days,
        }
    }
}

/// Optional filters for booking listings.
///
/// `car_owner_id` matches on the owner of the booked car, which lives on the
/// car row, so callers pass the owner in to [`BookingFilter::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub car_owner_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub car_id: Option<String>,
    pub user_id: Option<String>,
}

impl BookingFilter {
    /// Pending bookings on cars owned by `owner_id` (the approval queue).
    pub fn pending_for_owner(owner_id: impl Into<String>) -> Self {
        BookingFilter {
            car_owner_id: Some(owner_id.into()),
            status: Some(BookingStatus::Pending),
            ..Default::default()
        }
    }

    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        BookingFilter {
            car_owner_id: Some(owner_id.into()),
            ..Default::default()
        }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        BookingFilter {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn for_car(car_id: impl Into<String>) -> Self {
        BookingFilter {
            car_id: Some(car_id.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, booking: &Booking, car_owner_id: &str) -> bool {
        self.car_owner_id.as_deref().map_or(true, |o| o == car_owner_id)
            && self.status.map_or(true, |s| s == booking.status)
            && self.car_id.as_deref().map_or(true, |c| c == booking.car_id)
            && self.user_id.as_deref().map_or(true, |u| u == booking.user_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn car(owner: &str, status: CarStatus) -> Car {
        let now = Utc::now();
        Car {
            id: "C001".to_string(),
            name: "Toyota Camry".to_string(),
            model: "Camry".to_string(),
            category: "Sedan".to_string(),
            fuel_type: "Petrol".to_string(),
            seats: 5,
            transmission: "Automatic".to_string(),
            price_per_day: Money::from_major(3500),
            status,
            owner_id: owner.to_string(),
            image_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_parsing_at_boundary() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Seller".parse::<Role>().unwrap(), Role::Seller);
        assert_eq!(" USER ".parse::<Role>().unwrap(), Role::User);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Seller).unwrap(), "\"seller\"");
        assert_eq!(
            serde_json::to_string(&CarStatus::Available).unwrap(),
            "\"Available\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"Pending\""
        );
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(CarStatus::default(), CarStatus::Available);
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("rented".parse::<CarStatus>().unwrap(), CarStatus::Rented);
        assert_eq!("Sold".parse::<CarStatus>().unwrap(), CarStatus::Sold);
        assert!("leased".parse::<CarStatus>().is_err());
        assert_eq!(
            "Confirmed".parse::<BookingStatus>().unwrap(),
            BookingStatus::Confirmed
        );
        assert!("approved".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_image_placeholder() {
        let mut c = car("U004", CarStatus::Available);
        assert_eq!(c.image_or_placeholder(), PLACEHOLDER_IMAGE);

        c.image_path = Some("   ".to_string());
        assert_eq!(c.image_or_placeholder(), PLACEHOLDER_IMAGE);

        c.image_path = Some("images/Toyota_Camry.jpeg".to_string());
        assert_eq!(c.image_or_placeholder(), "images/Toyota_Camry.jpeg");
    }

    #[test]
    fn test_car_filter() {
        let c = car("U004", CarStatus::Available);
        assert!(CarFilter::default().matches(&c));
        assert!(CarFilter::owned_by("U004").matches(&c));
        assert!(!CarFilter::owned_by("U005").matches(&c));
        assert!(!CarFilter::default().with_status(CarStatus::Sold).matches(&c));
    }

    #[test]
    fn test_booking_filter() {
        let booking = Booking {
            id: "B1".to_string(),
            car_id: "C001".to_string(),
            user_id: "U002".to_string(),
            pickup_place: "Downtown".to_string(),
            pickup_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            pickup_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            days: 3,
            total_price: Money::from_major(10500),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        };

        assert!(BookingFilter::pending_for_owner("U004").matches(&booking, "U004"));
        assert!(!BookingFilter::pending_for_owner("U005").matches(&booking, "U004"));
        assert!(BookingFilter::for_user("U002").matches(&booking, "U004"));
        assert!(!BookingFilter::for_car("C002").matches(&booking, "U004"));
        assert!(!BookingFilter::for_user("U002")
            .with_status(BookingStatus::Confirmed)
            .matches(&booking, "U004"));
    }
}
