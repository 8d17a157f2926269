//! # Inventory Service
//!
//! Listing, editing and retiring cars.
//!
//! Car writes share the booking engine's per-car locks, so an edit never
//! interleaves with an approval of the same car.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use rental_core::authz;
use rental_core::validation::validate_car_draft;
use rental_core::{new_id, Car, CarDraft, CarFilter, CarStatus, CoreError, Role, ValidationError};

use crate::engine::{lock_car, require_car, require_user};
use crate::error::EngineResult;
use crate::locks::CarLocks;
use crate::store::EntityStore;

pub struct InventoryService<S> {
    store: Arc<S>,
    locks: Arc<CarLocks>,
}

impl<S: EntityStore> InventoryService<S> {
    pub(crate) fn new(store: Arc<S>, locks: Arc<CarLocks>) -> Self {
        InventoryService { store, locks }
    }

    /// Lists a new car as `Available`.
    ///
    /// Sellers always own what they list. Admins may name another seller or
    /// admin in `draft.owner_id` and own the car themselves otherwise.
    pub async fn add_car(&self, draft: &CarDraft, acting_user_id: &str) -> EngineResult<Car> {
        validate_car_draft(draft)?;

        let actor = require_user(self.store.as_ref(), acting_user_id).await?;
        authz::ensure_can_create_car(&actor).inspect_err(|e| {
            warn!(acting_user_id, error = %e, "Add car refused")
        })?;

        let owner_id = match (actor.role, draft.owner_id.as_deref()) {
            (Role::Admin, Some(owner_id)) if owner_id != actor.id => {
                let owner = require_user(self.store.as_ref(), owner_id).await?;
                if !authz::can_own_cars(&owner) {
                    return Err(ValidationError::InvalidFormat {
                        field: "owner_id".to_string(),
                        reason: format!("{} cannot own cars", owner.username),
                    }
                    .into());
                }
                owner.id
            }
            _ => actor.id.clone(),
        };

        let now = Utc::now();
        let car = Car {
            id: new_id(),
            name: draft.name.trim().to_string(),
            model: draft.model.trim().to_string(),
            category: draft.category.trim().to_string(),
            fuel_type: draft.fuel_type.trim().to_string(),
            seats: draft.seats,
            transmission: draft.transmission.trim().to_string(),
            price_per_day: draft.price_per_day,
            status: CarStatus::Available,
            owner_id,
            image_path: normalize_image_path(draft.image_path.as_deref()),
            created_at: now,
            updated_at: now,
        };

        self.store.save_car(&car).await?;
        info!(car_id = %car.id, owner_id = %car.owner_id, name = %car.name, "Car added");
        Ok(car)
    }

    /// Replaces a car's descriptive fields. Status and owner are kept.
    ///
    /// Existing bookings keep the total they were priced at.
    pub async fn update_car(
        &self,
        car_id: &str,
        draft: &CarDraft,
        acting_user_id: &str,
    ) -> EngineResult<Car> {
        validate_car_draft(draft)?;
        let actor = require_user(self.store.as_ref(), acting_user_id).await?;

        let (_guard, existing) = lock_car(self.store.as_ref(), &self.locks, car_id).await?;
        authz::ensure_can_edit_car(&actor, &existing).inspect_err(|e| {
            warn!(car_id, acting_user_id, error = %e, "Car update refused")
        })?;

        let car = Car {
            name: draft.name.trim().to_string(),
            model: draft.model.trim().to_string(),
            category: draft.category.trim().to_string(),
            fuel_type: draft.fuel_type.trim().to_string(),
            seats: draft.seats,
            transmission: draft.transmission.trim().to_string(),
            price_per_day: draft.price_per_day,
            image_path: normalize_image_path(draft.image_path.as_deref()),
            updated_at: Utc::now(),
            ..existing
        };

        self.store.save_car(&car).await?;
        info!(car_id, actor = %actor.id, "Car updated");
        Ok(car)
    }

    /// Deletes a car no booking references.
    ///
    /// Cars with booking history are retired with `mark_sold` instead.
    pub async fn delete_car(&self, car_id: &str, acting_user_id: &str) -> EngineResult<()> {
        let actor = require_user(self.store.as_ref(), acting_user_id).await?;

        let (guard, car) = lock_car(self.store.as_ref(), &self.locks, car_id).await?;
        authz::ensure_can_edit_car(&actor, &car).inspect_err(|e| {
            warn!(car_id, acting_user_id, error = %e, "Car delete refused")
        })?;

        let bookings = self.store.count_bookings_for_car(car_id).await?;
        if bookings > 0 {
            warn!(car_id, bookings, "Car delete refused, bookings reference it");
            return Err(CoreError::CarInUse {
                car_id: car_id.to_string(),
                bookings,
            }
            .into());
        }

        if !self.store.delete_car(car_id).await? {
            return Err(CoreError::not_found("Car", car_id).into());
        }
        drop(guard);
        self.locks.forget(car_id).await;

        info!(car_id, actor = %actor.id, "Car deleted");
        Ok(())
    }

    pub async fn list_cars(&self, filter: &CarFilter) -> EngineResult<Vec<Car>> {
        let cars = self.store.list_cars(filter).await?;
        debug!(count = cars.len(), "Listed cars");
        Ok(cars)
    }

    /// Cars a customer can book right now.
    pub async fn available_cars(&self) -> EngineResult<Vec<Car>> {
        self.list_cars(&CarFilter::default().with_status(CarStatus::Available))
            .await
    }

    /// Admins see every car, sellers their own, users what is bookable.
    pub async fn cars_for_actor(&self, acting_user_id: &str) -> EngineResult<Vec<Car>> {
        let actor = require_user(self.store.as_ref(), acting_user_id).await?;
        match actor.role {
            Role::Admin => self.list_cars(&CarFilter::default()).await,
            Role::Seller => self.list_cars(&CarFilter::owned_by(&actor.id)).await,
            Role::User => self.available_cars().await,
        }
    }

    pub async fn get_car(&self, car_id: &str) -> EngineResult<Car> {
        require_car(self.store.as_ref(), car_id).await
    }
}

/// Blank image references are stored as none.
fn normalize_image_path(path: Option<&str>) -> Option<String> {
    path.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}
