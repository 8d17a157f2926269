//! # rental-engine: Booking Engine for Car Rental
//!
//! Drives the booking lifecycle and the inventory and account operations
//! around it, over any [`EntityStore`].
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Booking Engine Architecture                      │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 BookingEngine<S: EntityStore>                    │  │
//! │  │                                                                  │  │
//! │  │  create_booking • approve_booking • reject_booking               │  │
//! │  │  pending queue • booking history • set_car_status / mark_sold    │  │
//! │  └───────┬───────────────────────┬────────────────────────┬─────────┘  │
//! │          │ inventory()           │ accounts()             │            │
//! │          ▼                       ▼                        │            │
//! │  ┌────────────────┐     ┌────────────────┐                │            │
//! │  │InventoryService│     │ AccountService │                │            │
//! │  │ add / edit /   │     │ signup, lookup │                │            │
//! │  │ delete cars    │     │ admin listing  │                │            │
//! │  └───────┬────────┘     └───────┬────────┘                │            │
//! │          │   shared per-car locks (CarLocks)              │            │
//! │          ▼                       ▼                        ▼            │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        EntityStore                               │  │
//! │  │        SqliteStore (rental-db)   |   MemoryStore (in-process)    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Rules come from rental-core: validation, authz, lifecycle, pricing.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`engine`] - `BookingEngine`, the lifecycle orchestrator
//! - [`inventory`] - Car listing and editing
//! - [`accounts`] - Signup and user lookup
//! - [`store`] - The `EntityStore` trait and its two implementations
//! - [`config`] - `rental.toml` plus environment overrides
//! - [`error`] - Engine errors and the API-facing `ErrorCode`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rental_engine::{BookingEngine, RentalConfig};
//! use rental_core::BookingRequest;
//!
//! let config = RentalConfig::load_or_default(None);
//! let engine = BookingEngine::open(&config).await?;
//!
//! let booking = engine
//!     .create_booking(&BookingRequest::new("C001", "U002", "Downtown", "2024-01-01", "10:00", 3))
//!     .await?;
//! engine.approve_booking(&booking.id, "U004").await?;
//! ```

pub mod accounts;
pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
mod locks;
pub mod store;

pub use accounts::AccountService;
pub use config::{ConfigError, ConfigResult, RentalConfig};
pub use engine::{BookingEngine, EngineSettings};
pub use error::{ApiError, EngineError, EngineResult, ErrorCode, StoreError, StoreResult};
pub use inventory::InventoryService;
pub use store::{EntityStore, MemoryStore, SqliteStore};

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber for binaries and tools embedding the engine.
///
/// `RUST_LOG` wins over the default `info,rental=debug,sqlx=warn`. Does
/// nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rental=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
