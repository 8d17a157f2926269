//! # Demo Dataset
//!
//! The accounts and inventory the rental desk ships with: one admin, two
//! customers, three sellers and four cars. Used by the `seed` binary and by
//! tests that want a realistic starting state.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::car::upsert_car;
use crate::repository::user::{count_users, upsert_user};
use rental_core::{Car, CarStatus, Money, Role, User};

/// `(id, username, role, contact)`
const USERS: &[(&str, &str, Role, Option<&str>)] = &[
    ("U001", "admin@demo", Role::Admin, Some("Admin Office")),
    ("U002", "user@demo", Role::User, Some("Customer 1")),
    ("U003", "user1@demo", Role::User, Some("Customer 2")),
    ("U004", "seller@demo", Role::Seller, Some("+91-9876543210")),
    ("U005", "seller1@demo", Role::Seller, Some("+91-9876543211")),
    ("U006", "seller2@demo", Role::Seller, Some("+91-9876543212")),
];

/// `(id, name, model, category, rupees per day, owner, fuel)`
const CARS: &[(&str, &str, &str, &str, i64, &str, &str)] = &[
    ("C001", "Toyota Camry", "Camry", "Sedan", 3500, "U004", "Petrol"),
    ("C002", "Honda Civic", "Civic", "Sedan", 3200, "U005", "Petrol"),
    ("C003", "BMW X5", "X5", "SUV", 7000, "U004", "Diesel"),
    ("C004", "Audi A6", "A6", "Sedan", 6500, "U006", "Petrol"),
];

pub fn demo_users(now: DateTime<Utc>) -> Vec<User> {
    USERS
        .iter()
        .map(|(id, username, role, contact)| User {
            id: id.to_string(),
            username: username.to_string(),
            role: *role,
            contact: contact.map(str::to_string),
            created_at: now,
        })
        .collect()
}

pub fn demo_cars(now: DateTime<Utc>) -> Vec<Car> {
    CARS.iter()
        .map(|(id, name, model, category, rupees, owner, fuel)| Car {
            id: id.to_string(),
            name: name.to_string(),
            model: model.to_string(),
            category: category.to_string(),
            fuel_type: fuel.to_string(),
            seats: 5,
            transmission: "Automatic".to_string(),
            price_per_day: Money::from_major(*rupees),
            status: CarStatus::Available,
            owner_id: owner.to_string(),
            image_path: Some(format!("images/{}.jpeg", name.replace(' ', "_"))),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Inserts the demo dataset unless the database already has users.
///
/// Returns `false` when seeding was skipped. All rows land in one
/// transaction, so a failed seed leaves the database empty.
pub async fn seed_demo(db: &Database) -> DbResult<bool> {
    let now = Utc::now();
    seed(db, &demo_users(now), &demo_cars(now)).await
}

async fn seed(db: &Database, users: &[User], cars: &[Car]) -> DbResult<bool> {
    let mut tx = db.pool().begin().await.map_err(DbError::transaction)?;

    let existing = count_users(&mut *tx).await?;
    if existing > 0 {
        info!(existing, "Users present, skipping demo seed");
        return Ok(false);
    }

    // An early return drops `tx`, which rolls it back
    for user in users {
        upsert_user(&mut *tx, user).await?;
    }
    for car in cars {
        upsert_car(&mut *tx, car).await?;
    }

    tx.commit().await.map_err(DbError::transaction)?;

    info!(users = users.len(), cars = cars.len(), "Demo data seeded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::in_memory().await.unwrap();

        assert!(seed_demo(&db).await.unwrap());
        assert!(!seed_demo(&db).await.unwrap());

        assert_eq!(db.users().count().await.unwrap(), 6);
        assert_eq!(db.cars().count().await.unwrap(), 4);

        let camry = db.cars().get_by_id("C001").await.unwrap().unwrap();
        assert_eq!(camry.price_per_day, Money::from_major(3500));
        assert_eq!(camry.owner_id, "U004");
        assert_eq!(camry.image_or_placeholder(), "images/Toyota_Camry.jpeg");
    }

    #[tokio::test]
    async fn test_failed_seed_leaves_database_empty() {
        let db = Database::in_memory().await.unwrap();
        let now = Utc::now();

        let mut cars = demo_cars(now);
        cars[3].owner_id = "U404".to_string();

        let err = seed(&db, &demo_users(now), &cars).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        assert_eq!(db.users().count().await.unwrap(), 0);
        assert_eq!(db.cars().count().await.unwrap(), 0);

        // Nothing was committed, so a clean seed still runs
        assert!(seed_demo(&db).await.unwrap());
        assert_eq!(db.cars().count().await.unwrap(), 4);
    }

    #[test]
    fn test_demo_owners_are_sellers() {
        let now = Utc::now();
        let users = demo_users(now);
        for car in demo_cars(now) {
            let owner = users.iter().find(|u| u.id == car.owner_id).unwrap();
            assert_eq!(owner.role, Role::Seller);
        }
    }
}
