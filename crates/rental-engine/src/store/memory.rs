//! In-process [`EntityStore`].
//!
//! All three tables sit behind one `RwLock`, so a transition's booking and
//! car writes land together. Nothing is persisted.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::EntityStore;
use rental_core::{Booking, BookingFilter, BookingStatus, Car, CarFilter, User};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    cars: HashMap<String, Car>,
    bookings: HashMap<String, Booking>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-filled with `users` and `cars`.
    pub fn with_data(users: Vec<User>, cars: Vec<Car>) -> Self {
        let tables = Tables {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            cars: cars.into_iter().map(|c| (c.id.clone(), c)).collect(),
            bookings: HashMap::new(),
        };
        MemoryStore {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let taken = tables
            .users
            .values()
            .any(|u| u.id != user.id && u.username.eq_ignore_ascii_case(&user.username));
        if taken {
            return Err(StoreError::Duplicate {
                field: "username".to_string(),
                value: user.username.clone(),
            });
        }

        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(users)
    }

    async fn get_car(&self, id: &str) -> StoreResult<Option<Car>> {
        Ok(self.tables.read().await.cars.get(id).cloned())
    }

    async fn list_cars(&self, filter: &CarFilter) -> StoreResult<Vec<Car>> {
        let tables = self.tables.read().await;
        let mut cars: Vec<Car> = tables
            .cars
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        cars.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));
        Ok(cars)
    }

    async fn save_car(&self, car: &Car) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let car = match tables.cars.get(&car.id) {
            // created_at is fixed at first insert
            Some(existing) => Car {
                created_at: existing.created_at,
                ..car.clone()
            },
            None => car.clone(),
        };
        tables.cars.insert(car.id.clone(), car);
        Ok(())
    }

    async fn delete_car(&self, id: &str) -> StoreResult<bool> {
        Ok(self.tables.write().await.cars.remove(id).is_some())
    }

    async fn get_booking(&self, id: &str) -> StoreResult<Option<Booking>> {
        Ok(self.tables.read().await.bookings.get(id).cloned())
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| {
                let owner = tables
                    .cars
                    .get(&b.car_id)
                    .map(|c| c.owner_id.as_str())
                    .unwrap_or_default();
                filter.matches(b, owner)
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(bookings)
    }

    async fn save_booking(&self, booking: &Booking) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let booking = match tables.bookings.get(&booking.id) {
            // The price snapshot never changes after creation
            Some(existing) => Booking {
                days: existing.days,
                total_price: existing.total_price,
                created_at: existing.created_at,
                ..booking.clone()
            },
            None => booking.clone(),
        };
        tables.bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn count_bookings_for_car(&self, car_id: &str) -> StoreResult<usize> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.values().filter(|b| b.car_id == car_id).count())
    }

    async fn commit_transition(
        &self,
        booking: &Booking,
        expected: BookingStatus,
        car: Option<&Car>,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let Tables { cars, bookings, .. } = &mut *tables;

        let stored = bookings
            .get_mut(&booking.id)
            .filter(|b| b.status == expected)
            .ok_or_else(|| StoreError::conflict("Booking", &booking.id))?;
        let stored_car = match car {
            Some(car) => Some((
                cars.get_mut(&car.id)
                    .ok_or_else(|| StoreError::not_found("Car", &car.id))?,
                car,
            )),
            None => None,
        };

        stored.status = booking.status;
        stored.decided_at = booking.decided_at;
        if let Some((stored_car, car)) = stored_car {
            stored_car.status = car.status;
            stored_car.updated_at = car.updated_at;
        }

        debug!(id = %booking.id, to = %booking.status, "Booking transition committed");
        Ok(())
    }
}
