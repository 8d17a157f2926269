//! # Entity Store
//!
//! The persistence seam between the engine and wherever users, cars and
//! bookings live.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EntityStore                                      │
//! │                                                                         │
//! │  BookingEngine<S: EntityStore>                                          │
//! │       │                                                                 │
//! │       ├──────────────────────────┬──────────────────────────────┐      │
//! │       ▼                          ▼                              │      │
//! │  SqliteStore                 MemoryStore                        │      │
//! │  rental-db repositories      RwLock<HashMap<..>> per entity     │      │
//! │  one transaction per         one write lock per                 │      │
//! │  commit_transition           commit_transition                  │      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Saves are id-keyed upserts. Only [`EntityStore::commit_transition`]
//! checks the previous state of what it writes.

use async_trait::async_trait;

use crate::error::StoreResult;
use rental_core::{Booking, BookingFilter, BookingStatus, Car, CarFilter, User};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;

    /// Case-insensitive.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn save_user(&self, user: &User) -> StoreResult<()>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn get_car(&self, id: &str) -> StoreResult<Option<Car>>;

    async fn list_cars(&self, filter: &CarFilter) -> StoreResult<Vec<Car>>;

    async fn save_car(&self, car: &Car) -> StoreResult<()>;

    /// Removes a car. Returns `false` if there was none.
    async fn delete_car(&self, id: &str) -> StoreResult<bool>;

    async fn get_booking(&self, id: &str) -> StoreResult<Option<Booking>>;

    /// Newest first.
    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>>;

    async fn save_booking(&self, booking: &Booking) -> StoreResult<()>;

    /// Bookings of any status referencing `car_id`.
    async fn count_bookings_for_car(&self, car_id: &str) -> StoreResult<usize>;

    /// Atomically writes `booking`'s new status (and `car`, if given).
    ///
    /// Fails with [`crate::StoreError::Conflict`] and writes nothing when the
    /// stored booking's status is no longer `expected`, and with
    /// [`crate::StoreError::NotFound`] when `car` no longer exists.
    async fn commit_transition(
        &self,
        booking: &Booking,
        expected: BookingStatus,
        car: Option<&Car>,
    ) -> StoreResult<()>;
}
