//! # Car Repository
//!
//! Inventory rows. Status is written here only through [`CarRepository::upsert`]
//! and [`CarRepository::set_status`]; approvals change it inside the booking
//! transition (see `booking.rs`).

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use rental_core::{Car, CarFilter, CarStatus};

const CAR_COLUMNS: &str = "id, name, model, category, fuel_type, seats, transmission, \
     price_per_day, status, owner_id, image_path, created_at, updated_at";

/// Repository for car database operations.
#[derive(Debug, Clone)]
pub struct CarRepository {
    pool: SqlitePool,
}

impl CarRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CarRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Car>> {
        let sql = format!("SELECT {} FROM cars WHERE id = ?1", CAR_COLUMNS);

        let car = sqlx::query_as::<_, Car>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    /// Lists cars matching `filter`, by name.
    pub async fn list(&self, filter: &CarFilter) -> DbResult<Vec<Car>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM cars WHERE 1 = 1", CAR_COLUMNS));

        if let Some(owner_id) = &filter.owner_id {
            qb.push(" AND owner_id = ").push_bind(owner_id.clone());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        qb.push(" ORDER BY name, id");

        let cars = qb.build_query_as::<Car>().fetch_all(&self.pool).await?;

        debug!(count = cars.len(), "Listed cars");
        Ok(cars)
    }

    /// Inserts or replaces a car keyed by id. `created_at` is kept on update.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - owner_id names no user
    pub async fn upsert(&self, car: &Car) -> DbResult<()> {
        upsert_car(&self.pool, car).await
    }

    /// Sets a car's status directly (mark sold, back to available).
    pub async fn set_status(&self, id: &str, status: CarStatus) -> DbResult<()> {
        debug!(id = %id, status = %status, "Setting car status");

        let result = sqlx::query("UPDATE cars SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }

        Ok(())
    }

    /// Hard-deletes a car.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no such car
    /// * `DbError::ForeignKeyViolation` - bookings still reference it
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting car");

        let result = sqlx::query("DELETE FROM cars WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// [`CarRepository::upsert`] on any executor, including an open transaction.
pub(crate) async fn upsert_car<'e, E>(executor: E, car: &Car) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(id = %car.id, status = %car.status, "Saving car");

    sqlx::query(
        r#"
        INSERT INTO cars (
            id, name, model, category, fuel_type, seats, transmission,
            price_per_day, status, owner_id, image_path, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7,
            ?8, ?9, ?10, ?11, ?12, ?13
        )
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            model = excluded.model,
            category = excluded.category,
            fuel_type = excluded.fuel_type,
            seats = excluded.seats,
            transmission = excluded.transmission,
            price_per_day = excluded.price_per_day,
            status = excluded.status,
            owner_id = excluded.owner_id,
            image_path = excluded.image_path,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&car.id)
    .bind(&car.name)
    .bind(&car.model)
    .bind(&car.category)
    .bind(&car.fuel_type)
    .bind(car.seats)
    .bind(&car.transmission)
    .bind(car.price_per_day)
    .bind(car.status)
    .bind(&car.owner_id)
    .bind(&car.image_path)
    .bind(car.created_at)
    .bind(car.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}
