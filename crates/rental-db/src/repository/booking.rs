//! # Booking Repository
//!
//! ## Booking Lifecycle in SQL
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Booking Lifecycle                                 │
//! │                                                                         │
//! │  1. REQUEST                                                            │
//! │     └── upsert() → bookings row { status: 'Pending' }                  │
//! │                                                                         │
//! │  2. DECIDE (one transaction)                                           │
//! │     └── transition(booking, expected = Pending, car)                   │
//! │         ├── UPDATE bookings SET status = ?                             │
//! │         │       WHERE id = ? AND status = 'Pending'                    │
//! │         │   0 rows? → ROLLBACK, DbError::Conflict                      │
//! │         ├── UPDATE cars SET status = 'Rented'   (approve only)         │
//! │         └── COMMIT                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use rental_core::{Booking, BookingFilter, BookingStatus, Car};

const BOOKING_COLUMNS: &str = "b.id, b.car_id, b.user_id, b.pickup_place, b.pickup_date, \
     b.pickup_time, b.days, b.total_price, b.status, b.created_at, b.decided_at";

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Booking>> {
        let sql = format!("SELECT {} FROM bookings b WHERE b.id = ?1", BOOKING_COLUMNS);

        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    /// Lists bookings matching `filter`, newest first.
    ///
    /// The owner filter joins `cars`, so ownership is read as of now.
    pub async fn list(&self, filter: &BookingFilter) -> DbResult<Vec<Booking>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM bookings b JOIN cars c ON c.id = b.car_id WHERE 1 = 1",
            BOOKING_COLUMNS
        ));

        if let Some(owner_id) = &filter.car_owner_id {
            qb.push(" AND c.owner_id = ").push_bind(owner_id.clone());
        }
        if let Some(status) = filter.status {
            qb.push(" AND b.status = ").push_bind(status);
        }
        if let Some(car_id) = &filter.car_id {
            qb.push(" AND b.car_id = ").push_bind(car_id.clone());
        }
        if let Some(user_id) = &filter.user_id {
            qb.push(" AND b.user_id = ").push_bind(user_id.clone());
        }
        qb.push(" ORDER BY b.created_at DESC, b.id DESC");

        let bookings = qb.build_query_as::<Booking>().fetch_all(&self.pool).await?;

        debug!(count = bookings.len(), "Listed bookings");
        Ok(bookings)
    }

    /// Number of bookings (any status) referencing a car.
    pub async fn count_for_car(&self, car_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE car_id = ?1")
            .bind(car_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts or replaces a booking keyed by id.
    ///
    /// The price snapshot (`days`, `total_price`) is never rewritten on update.
    pub async fn upsert(&self, booking: &Booking) -> DbResult<()> {
        debug!(id = %booking.id, car_id = %booking.car_id, status = %booking.status, "Saving booking");

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, car_id, user_id, pickup_place, pickup_date, pickup_time,
                days, total_price, status, created_at, decided_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11
            )
            ON CONFLICT(id) DO UPDATE SET
                pickup_place = excluded.pickup_place,
                pickup_date = excluded.pickup_date,
                pickup_time = excluded.pickup_time,
                status = excluded.status,
                decided_at = excluded.decided_at
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.car_id)
        .bind(&booking.user_id)
        .bind(&booking.pickup_place)
        .bind(booking.pickup_date)
        .bind(booking.pickup_time)
        .bind(booking.days)
        .bind(booking.total_price)
        .bind(booking.status)
        .bind(booking.created_at)
        .bind(booking.decided_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes a booking status change and, optionally, the car's new status
    /// in one transaction.
    ///
    /// The booking row is only updated while its stored status still equals
    /// `expected`; otherwise nothing is written.
    ///
    /// ## Errors
    /// * `DbError::Conflict` - stored status moved away from `expected`
    /// * `DbError::NotFound` - `car` no longer exists
    pub async fn transition(
        &self,
        booking: &Booking,
        expected: BookingStatus,
        car: Option<&Car>,
    ) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(DbError::transaction)?;

        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?2, decided_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(&booking.id)
        .bind(booking.status)
        .bind(booking.decided_at)
        .bind(expected)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(DbError::transaction)?;
            return Err(DbError::conflict("Booking", &booking.id));
        }

        if let Some(car) = car {
            let result =
                sqlx::query("UPDATE cars SET status = ?2, updated_at = ?3 WHERE id = ?1")
                    .bind(&car.id)
                    .bind(car.status)
                    .bind(car.updated_at)
                    .execute(&mut *tx)
                    .await?;

            if result.rows_affected() == 0 {
                tx.rollback()
                    .await
                    .map_err(DbError::transaction)?;
                return Err(DbError::not_found("Car", &car.id));
            }
        }

        tx.commit()
            .await
            .map_err(DbError::transaction)?;

        info!(
            id = %booking.id,
            from = %expected,
            to = %booking.status,
            "Booking transition committed"
        );
        Ok(())
    }
}
