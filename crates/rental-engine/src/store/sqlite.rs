//! SQLite-backed [`EntityStore`] over the `rental-db` repositories.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::store::EntityStore;
use rental_core::{Booking, BookingFilter, BookingStatus, Car, CarFilter, User};
use rental_db::{Database, DbError};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        SqliteStore { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.db.users().get_by_id(id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.db.users().find_by_username(username).await?)
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        Ok(self.db.users().upsert(user).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.db.users().list().await?)
    }

    async fn get_car(&self, id: &str) -> StoreResult<Option<Car>> {
        Ok(self.db.cars().get_by_id(id).await?)
    }

    async fn list_cars(&self, filter: &CarFilter) -> StoreResult<Vec<Car>> {
        Ok(self.db.cars().list(filter).await?)
    }

    async fn save_car(&self, car: &Car) -> StoreResult<()> {
        Ok(self.db.cars().upsert(car).await?)
    }

    async fn delete_car(&self, id: &str) -> StoreResult<bool> {
        match self.db.cars().delete(id).await {
            Ok(()) => Ok(true),
            Err(DbError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StoreError::from(e)),
        }
    }

    async fn get_booking(&self, id: &str) -> StoreResult<Option<Booking>> {
        Ok(self.db.bookings().get_by_id(id).await?)
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        Ok(self.db.bookings().list(filter).await?)
    }

    async fn save_booking(&self, booking: &Booking) -> StoreResult<()> {
        Ok(self.db.bookings().upsert(booking).await?)
    }

    async fn count_bookings_for_car(&self, car_id: &str) -> StoreResult<usize> {
        let count = self.db.bookings().count_for_car(car_id).await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn commit_transition(
        &self,
        booking: &Booking,
        expected: BookingStatus,
        car: Option<&Car>,
    ) -> StoreResult<()> {
        Ok(self.db.bookings().transition(booking, expected, car).await?)
    }
}
