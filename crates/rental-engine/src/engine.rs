//! # Booking Engine
//!
//! Orchestrates the booking lifecycle against an injected [`EntityStore`].
//!
//! ## Approve Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  approve_booking("B1", "U004")                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve actor U004, read B1 to learn its car                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ══════ lock car C001 ═════════════════════════════════════════════    │
//! │       │                                                                 │
//! │       ├── re-read B1 and C001                                           │
//! │       ├── authz::ensure_can_act_on_booking ──► Forbidden               │
//! │       ├── lifecycle::check_transition      ──► InvalidTransition       │
//! │       ├── C001 still Available?            ──► NotAvailable            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.commit_transition(B1 Confirmed, expected Pending, C001 Rented)   │
//! │  ══════ unlock ════════════════════════════════════════════════════    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every refusal happens before the first write.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};

use rental_core::authz;
use rental_core::lifecycle::check_transition;
use rental_core::pricing::compute_total;
use rental_core::validation::{
    parse_pickup_date, parse_pickup_time, validate_days, validate_pickup_place, DayBounds,
};
use rental_core::{
    new_id, Booking, BookingAction, BookingFilter, BookingRequest, BookingStatus, Car,
    CarStatus, CoreError, Role, User, MAX_PICKUP_PLACE_LEN,
};

use crate::accounts::AccountService;
use crate::config::RentalConfig;
use crate::error::{EngineResult, StoreError};
use crate::inventory::InventoryService;
use crate::locks::CarLocks;
use crate::store::{EntityStore, SqliteStore};

/// Tunables the engine reads on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub day_bounds: DayBounds,
    pub max_pickup_place_len: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            day_bounds: DayBounds::default(),
            max_pickup_place_len: MAX_PICKUP_PLACE_LEN,
        }
    }
}

/// The booking engine.
///
/// Cloning is cheap and clones share the store and the car locks.
pub struct BookingEngine<S> {
    store: Arc<S>,
    settings: EngineSettings,
    locks: Arc<CarLocks>,
}

impl<S> Clone for BookingEngine<S> {
    fn clone(&self) -> Self {
        BookingEngine {
            store: Arc::clone(&self.store),
            settings: self.settings,
            locks: Arc::clone(&self.locks),
        }
    }
}

impl BookingEngine<SqliteStore> {
    /// Opens the configured SQLite database and builds an engine over it.
    pub async fn open(config: &RentalConfig) -> EngineResult<Self> {
        let db = rental_db::Database::new(config.db_config())
            .await
            .map_err(StoreError::from)?;
        Ok(BookingEngine::new(
            Arc::new(SqliteStore::new(db)),
            config.engine_settings(),
        ))
    }
}

impl<S: EntityStore> BookingEngine<S> {
    pub fn new(store: Arc<S>, settings: EngineSettings) -> Self {
        BookingEngine {
            store,
            settings,
            locks: Arc::new(CarLocks::default()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Car listing and editing, sharing this engine's store and locks.
    pub fn inventory(&self) -> InventoryService<S> {
        InventoryService::new(Arc::clone(&self.store), Arc::clone(&self.locks))
    }

    pub fn accounts(&self) -> AccountService<S> {
        AccountService::new(Arc::clone(&self.store))
    }

    // =========================================================================
    // Booking Creation
    // =========================================================================

    /// Creates a `Pending` booking for an `Available` car.
    ///
    /// ## Check Order
    /// 1. Input (days, pickup place/date/time) → `InvalidInput`
    /// 2. Requesting user exists → `NotFound`; has role `user` → `Forbidden`
    /// 3. Car exists → `NotFound`; is `Available` → `NotAvailable`
    ///
    /// The car's status is not touched: a pending booking does not reserve it.
    pub async fn create_booking(&self, request: &BookingRequest) -> EngineResult<Booking> {
        self.try_create_booking(request).await.inspect_err(|e| {
            warn!(
                car_id = %request.car_id,
                user_id = %request.user_id,
                error = %e,
                "Booking request refused"
            )
        })
    }

    async fn try_create_booking(&self, request: &BookingRequest) -> EngineResult<Booking> {
        let days = validate_days(request.days, self.settings.day_bounds)?;
        let pickup_place =
            validate_pickup_place(&request.pickup_place, self.settings.max_pickup_place_len)?;
        let pickup_date = parse_pickup_date(&request.pickup_date)?;
        let pickup_time = parse_pickup_time(&request.pickup_time)?;

        let user = require_user(self.store.as_ref(), &request.user_id).await?;
        authz::ensure_can_request_booking(&user)?;

        let (_guard, car) = lock_car(self.store.as_ref(), &self.locks, &request.car_id).await?;
        if !car.status.is_available() {
            return Err(CoreError::NotAvailable {
                car_id: car.id,
                status: car.status,
            }
            .into());
        }

        let total_price = compute_total(car.price_per_day, days)?;

        let booking = Booking {
            id: new_id(),
            car_id: car.id.clone(),
            user_id: user.id.clone(),
            pickup_place,
            pickup_date,
            pickup_time,
            days,
            total_price,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        };

        self.store.save_booking(&booking).await?;

        info!(
            booking_id = %booking.id,
            car_id = %booking.car_id,
            user_id = %booking.user_id,
            days,
            total = %booking.total_price,
            "Booking requested"
        );
        Ok(booking)
    }

    // =========================================================================
    // Decisions
    // =========================================================================

    /// Confirms a pending booking and marks its car `Rented`.
    ///
    /// ## Errors
    /// - `NotFound` - booking, actor or car missing
    /// - `Forbidden` - actor is neither admin nor the car's owner
    /// - `InvalidTransition` - booking is not `Pending`
    /// - `NotAvailable` - the car was rented or sold since the request
    pub async fn approve_booking(
        &self,
        booking_id: &str,
        acting_user_id: &str,
    ) -> EngineResult<Booking> {
        self.decide(booking_id, acting_user_id, BookingAction::Approve)
            .await
            .inspect_err(|e| warn!(booking_id, acting_user_id, error = %e, "Approve refused"))
    }

    /// Rejects a pending booking. The car is untouched.
    pub async fn reject_booking(
        &self,
        booking_id: &str,
        acting_user_id: &str,
    ) -> EngineResult<Booking> {
        self.decide(booking_id, acting_user_id, BookingAction::Reject)
            .await
            .inspect_err(|e| warn!(booking_id, acting_user_id, error = %e, "Reject refused"))
    }

    async fn decide(
        &self,
        booking_id: &str,
        acting_user_id: &str,
        action: BookingAction,
    ) -> EngineResult<Booking> {
        let actor = require_user(self.store.as_ref(), acting_user_id).await?;

        // The car id never changes, so it is safe to read before locking
        let car_id = require_booking(self.store.as_ref(), booking_id).await?.car_id;
        let (_guard, mut car) = lock_car(self.store.as_ref(), &self.locks, &car_id).await?;
        let booking = require_booking(self.store.as_ref(), booking_id).await?;

        authz::ensure_can_act_on_booking(&actor, &booking, &car, action.verb())?;
        let target = check_transition(&booking, action)?;

        if action.requires_available_car() && !car.status.is_available() {
            return Err(CoreError::NotAvailable {
                car_id: car.id,
                status: car.status,
            }
            .into());
        }

        let now = Utc::now();
        let expected = booking.status;
        let decided = Booking {
            status: target,
            decided_at: Some(now),
            ..booking
        };

        let car_update = match action.car_effect() {
            Some(status) => {
                car.status = status;
                car.updated_at = now;
                Some(&car)
            }
            None => None,
        };

        self.store
            .commit_transition(&decided, expected, car_update)
            .await?;

        info!(
            booking_id = %decided.id,
            car_id = %decided.car_id,
            actor = %actor.id,
            action = %action,
            status = %decided.status,
            "Booking decided"
        );
        Ok(decided)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Pending bookings on cars owned by `owner_id`.
    pub async fn list_pending_for_owner(&self, owner_id: &str) -> EngineResult<Vec<Booking>> {
        let bookings = self
            .store
            .list_bookings(&BookingFilter::pending_for_owner(owner_id))
            .await?;
        debug!(owner_id, count = bookings.len(), "Listed pending bookings");
        Ok(bookings)
    }

    /// Size of the owner's approval queue ("you have N pending bookings").
    pub async fn pending_count_for_owner(&self, owner_id: &str) -> EngineResult<usize> {
        Ok(self.list_pending_for_owner(owner_id).await?.len())
    }

    /// A user's booking history, newest first.
    pub async fn bookings_for_user(&self, user_id: &str) -> EngineResult<Vec<Booking>> {
        Ok(self
            .store
            .list_bookings(&BookingFilter::for_user(user_id))
            .await?)
    }

    /// Bookings visible to the actor: all for admins, those on owned cars
    /// for sellers, their own for users.
    pub async fn bookings_for_actor(&self, acting_user_id: &str) -> EngineResult<Vec<Booking>> {
        let actor = require_user(self.store.as_ref(), acting_user_id).await?;
        let filter = match actor.role {
            Role::Admin => BookingFilter::default(),
            Role::Seller => BookingFilter::for_owner(&actor.id),
            Role::User => BookingFilter::for_user(&actor.id),
        };
        Ok(self.store.list_bookings(&filter).await?)
    }

    pub async fn get_booking(&self, booking_id: &str) -> EngineResult<Booking> {
        require_booking(self.store.as_ref(), booking_id).await
    }

    /// Like [`Self::get_booking`], but only for the requester, the car's
    /// owner or an admin.
    pub async fn get_booking_for(
        &self,
        booking_id: &str,
        acting_user_id: &str,
    ) -> EngineResult<Booking> {
        let actor = require_user(self.store.as_ref(), acting_user_id).await?;
        let booking = require_booking(self.store.as_ref(), booking_id).await?;
        let car = require_car(self.store.as_ref(), &booking.car_id).await?;
        authz::ensure_can_view_booking(&actor, &booking, &car)?;
        Ok(booking)
    }

    // =========================================================================
    // Direct Car Status Edits
    // =========================================================================

    /// Sets a car's status directly, independent of its bookings.
    ///
    /// Authorized like a car edit: the owning seller or an admin.
    pub async fn set_car_status(
        &self,
        car_id: &str,
        status: CarStatus,
        acting_user_id: &str,
    ) -> EngineResult<Car> {
        let actor = require_user(self.store.as_ref(), acting_user_id).await?;

        let (_guard, mut car) = lock_car(self.store.as_ref(), &self.locks, car_id).await?;

        authz::ensure_can_edit_car(&actor, &car).inspect_err(|e| {
            warn!(car_id, acting_user_id, error = %e, "Car status change refused")
        })?;

        let previous = car.status;
        car.status = status;
        car.updated_at = Utc::now();
        self.store.save_car(&car).await?;

        info!(car_id, from = %previous, to = %status, actor = %actor.id, "Car status set");
        Ok(car)
    }

    pub async fn mark_sold(&self, car_id: &str, acting_user_id: &str) -> EngineResult<Car> {
        self.set_car_status(car_id, CarStatus::Sold, acting_user_id)
            .await
    }
}

// =============================================================================
// Lookups
// =============================================================================

pub(crate) async fn require_user<S: EntityStore + ?Sized>(
    store: &S,
    id: &str,
) -> EngineResult<User> {
    store
        .get_user(id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id).into())
}

pub(crate) async fn require_car<S: EntityStore + ?Sized>(store: &S, id: &str) -> EngineResult<Car> {
    store
        .get_car(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Car", id).into())
}

/// Takes the lock of an existing car and returns the car as read under it.
///
/// Unknown ids never get a lock entry. A car deleted while the caller waited
/// has its entry dropped again.
pub(crate) async fn lock_car<S: EntityStore + ?Sized>(
    store: &S,
    locks: &CarLocks,
    car_id: &str,
) -> EngineResult<(OwnedMutexGuard<()>, Car)> {
    require_car(store, car_id).await?;

    let guard = locks.lock(car_id).await;
    match store.get_car(car_id).await? {
        Some(car) => Ok((guard, car)),
        None => {
            drop(guard);
            locks.forget(car_id).await;
            Err(CoreError::not_found("Car", car_id).into())
        }
    }
}

pub(crate) async fn require_booking<S: EntityStore + ?Sized>(
    store: &S,
    id: &str,
) -> EngineResult<Booking> {
    store
        .get_booking(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Booking", id).into())
}

// =============================================================================
// Unit Tests
// =============================================================================
