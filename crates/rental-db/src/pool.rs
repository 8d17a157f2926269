//! # Connection Pool
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [database] in rental.toml ──► DbConfig ──► Database::new               │
//! │                                                 │                       │
//! │                          ┌──────────────────────┴──────────┐            │
//! │                          ▼                                 ▼            │
//! │                 DbLocation::File                  DbLocation::Memory    │
//! │                 WAL, up to N connections          one pinned connection │
//! │                          │                                 │            │
//! │                          └──────────────┬──────────────────┘            │
//! │                                         ▼                               │
//! │                  embedded migrations, then db.users() / db.cars() /     │
//! │                  db.bookings() over the shared SqlitePool               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every connection enables `foreign_keys`, so bookings can never point at
//! a missing car or user.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::booking::BookingRepository;
use crate::repository::car::CarRepository;
use crate::repository::user::UserRepository;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),

    /// Private to one pool and gone when it closes.
    Memory,
}

impl DbLocation {
    /// `:memory:` selects [`DbLocation::Memory`], anything else is a file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path == Path::new(":memory:") {
            DbLocation::Memory
        } else {
            DbLocation::File(path.to_path_buf())
        }
    }
}

impl std::fmt::Display for DbLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbLocation::File(path) => write!(f, "{}", path.display()),
            DbLocation::Memory => f.write_str(":memory:"),
        }
    }
}

/// Pool settings.
///
/// ```rust,ignore
/// let config = DbConfig::new("./car_rental.db")
///     .max_connections(5)
///     .connect_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Ignored for in-memory databases, which always use one connection.
    pub max_connections: u32,

    /// How long to wait for a free connection.
    pub connect_timeout: Duration,

    /// How long a writer waits on SQLite's file lock before failing.
    pub busy_timeout: Duration,

    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        DbConfig {
            location: DbLocation::from_path(path),
            max_connections: 5,
            connect_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A fresh, migrated, private database. Each call is isolated.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }
}

/// Handle to the rental database.
///
/// Cloning is cheap; every clone shares the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database and applies migrations.
    ///
    /// ## Errors
    /// * `DbError::ConnectionFailed` - the file could not be opened
    /// * `DbError::MigrationFailed` - the schema could not be applied
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = %config.location, "Opening rental database");

        let base = SqliteConnectOptions::new()
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let pool = match &config.location {
            DbLocation::File(path) => {
                let options = base
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal);

                SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.connect_timeout)
                    .connect_with(options)
                    .await
            }
            DbLocation::Memory => {
                // The data lives in the connection, so it must never be recycled
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .acquire_timeout(config.connect_timeout)
                    .connect_with(base.in_memory(true))
                    .await
            }
        }
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Shorthand for `Database::new(DbConfig::in_memory())`.
    pub async fn in_memory() -> DbResult<Self> {
        Database::new(DbConfig::in_memory()).await
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        info!("Rental schema up to date");
        Ok(())
    }

    /// The raw pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn cars(&self) -> CarRepository {
        CarRepository::new(self.pool.clone())
    }

    pub fn bookings(&self) -> BookingRepository {
        BookingRepository::new(self.pool.clone())
    }

    /// Closes the pool. Every repository operation fails afterwards.
    pub async fn close(&self) {
        info!("Closing rental database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(db.cars().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let a = Database::in_memory().await.unwrap();
        let b = Database::in_memory().await.unwrap();

        sqlx::query(
            "INSERT INTO users (id, username, role, contact, created_at) \
             VALUES ('U1', 'only-in-a', 'user', NULL, '2024-01-01T00:00:00Z')",
        )
        .execute(a.pool())
        .await
        .unwrap();

        assert_eq!(a.users().count().await.unwrap(), 1);
        assert_eq!(b.users().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::in_memory().await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = Database::in_memory().await.unwrap();

        let err = sqlx::query(
            "INSERT INTO bookings (id, car_id, user_id, pickup_place, pickup_date, \
             pickup_time, days, total_price, status, created_at) \
             VALUES ('B1', 'C404', 'U404', 'Airport', '2024-01-01', '10:00:00', 1, 100, \
             'Pending', '2024-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap_err();

        assert!(matches!(
            DbError::from(err),
            DbError::ForeignKeyViolation { .. }
        ));
    }

    #[test]
    fn test_location_from_path() {
        assert_eq!(DbLocation::from_path(":memory:"), DbLocation::Memory);
        assert_eq!(
            DbLocation::from_path("data/car_rental.db"),
            DbLocation::File(PathBuf::from("data/car_rental.db"))
        );
        assert_eq!(DbLocation::Memory.to_string(), ":memory:");
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .busy_timeout(Duration::from_secs(1))
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert!(!config.run_migrations);
    }
}
