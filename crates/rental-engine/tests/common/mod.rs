//! Shared fixtures: engines preloaded with the demo accounts and cars.
//!
//! | id   | username     | role   |   | id   | car          | ₹/day | owner |
//! |------|--------------|--------|---|------|--------------|-------|-------|
//! | U001 | admin@demo   | admin  |   | C001 | Toyota Camry | 3500  | U004  |
//! | U002 | user@demo    | user   |   | C002 | Honda Civic  | 3200  | U005  |
//! | U003 | user1@demo   | user   |   | C003 | BMW X5       | 7000  | U004  |
//! | U004 | seller@demo  | seller |   | C004 | Audi A6      | 6500  | U006  |
//! | U005 | seller1@demo | seller |
//! | U006 | seller2@demo | seller |

#![allow(dead_code)]

use chrono::Utc;
use std::sync::Arc;

use rental_core::BookingRequest;
use rental_db::demo::{demo_cars, demo_users, seed_demo};
use rental_db::Database;
use rental_engine::{BookingEngine, EngineSettings, MemoryStore, SqliteStore};

pub const ADMIN: &str = "U001";
pub const CUSTOMER: &str = "U002";
pub const OTHER_CUSTOMER: &str = "U003";
pub const SELLER: &str = "U004";
pub const OTHER_SELLER: &str = "U005";

pub fn memory_engine() -> BookingEngine<MemoryStore> {
    let now = Utc::now();
    let store = MemoryStore::with_data(demo_users(now), demo_cars(now));
    BookingEngine::new(Arc::new(store), EngineSettings::default())
}

pub async fn sqlite_engine() -> BookingEngine<SqliteStore> {
    let db = Database::in_memory().await.unwrap();
    assert!(seed_demo(&db).await.unwrap());
    BookingEngine::new(Arc::new(SqliteStore::new(db)), EngineSettings::default())
}

/// A booking for `car_id` by `user_id` picked up downtown on 2024-01-01.
pub fn request(car_id: &str, user_id: &str, days: i64) -> BookingRequest {
    BookingRequest::new(car_id, user_id, "Downtown", "2024-01-01", "10:00", days)
}
