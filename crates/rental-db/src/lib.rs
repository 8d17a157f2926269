//! # rental-db: Database Layer for Car Rental
//!
//! SQLite persistence for users, cars and bookings, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Car Rental Data Flow                             │
//! │                                                                         │
//! │  BookingEngine::approve_booking                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStore (rental-engine) ── implements EntityStore                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     rental-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CarRepo       │    │ 001_initial  │  │   │
//! │  │   │ WAL, FKs on   │    │ BookingRepo   │    │  _schema.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  car_rental.db                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rental_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("car_rental.db")).await?;
//! let pending = db
//!     .bookings()
//!     .list(&BookingFilter::pending_for_owner("U004"))
//!     .await?;
//! ```

pub mod demo;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};

pub use repository::booking::BookingRepository;
pub use repository::car::CarRepository;
pub use repository::user::UserRepository;
