//! # Repository Module
//!
//! One repository per table, each owning a pool handle.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteStore (rental-engine)                                            │
//! │       │                                                                 │
//! │       │  db.bookings().transition(&booking, Pending, Some(&car))        │
//! │       ▼                                                                 │
//! │  UserRepository     get_by_id, find_by_username, upsert, list          │
//! │  CarRepository      get_by_id, list(filter), upsert, delete            │
//! │  BookingRepository  get_by_id, list(filter), upsert, transition        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are built at runtime (`query_as` + `FromRow`) so the crate builds
//! without a live database or offline query cache.

pub mod booking;
pub mod car;
pub mod user;
