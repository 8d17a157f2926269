//! The engine over the SQLite store, seeded with the demo data.

mod common;

use common::*;
use rental_core::{BookingStatus, CarStatus, Money, NewUser, Role};
use rental_engine::{BookingEngine, EngineError, EntityStore, ErrorCode, RentalConfig};

#[tokio::test]
async fn test_booking_lifecycle_persists() {
    let engine = sqlite_engine().await;

    let booking = engine
        .create_booking(&request("C001", CUSTOMER, 3))
        .await
        .unwrap();
    assert_eq!(booking.total_price, Money::from_major(10500));

    let stored = engine.store().get_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
    assert_eq!(stored.pickup_place, "Downtown");
    assert_eq!(stored.pickup_date, booking.pickup_date);
    assert_eq!(stored.pickup_time, booking.pickup_time);

    engine.approve_booking(&booking.id, SELLER).await.unwrap();

    let stored = engine.store().get_booking(&booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Confirmed);
    assert!(stored.decided_at.is_some());

    let car = engine.store().get_car("C001").await.unwrap().unwrap();
    assert_eq!(car.status, CarStatus::Rented);

    let err = engine
        .create_booking(&request("C001", OTHER_CUSTOMER, 1))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAvailable);
}

#[tokio::test]
async fn test_forbidden_leaves_rows_untouched() {
    let engine = sqlite_engine().await;
    let booking = engine
        .create_booking(&request("C001", CUSTOMER, 2))
        .await
        .unwrap();

    let err = engine
        .approve_booking(&booking.id, OTHER_SELLER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let stored = engine.get_booking(&booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
    let car = engine.store().get_car("C001").await.unwrap().unwrap();
    assert_eq!(car.status, CarStatus::Available);
}

#[tokio::test]
async fn test_pending_queue_and_history() {
    let engine = sqlite_engine().await;
    let first = engine
        .create_booking(&request("C001", CUSTOMER, 1))
        .await
        .unwrap();
    engine
        .create_booking(&request("C003", CUSTOMER, 2))
        .await
        .unwrap();
    engine
        .create_booking(&request("C002", OTHER_CUSTOMER, 1))
        .await
        .unwrap();

    assert_eq!(engine.pending_count_for_owner(SELLER).await.unwrap(), 2);

    engine.reject_booking(&first.id, SELLER).await.unwrap();
    let queue = engine.list_pending_for_owner(SELLER).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].car_id, "C003");

    let history = engine.bookings_for_user(CUSTOMER).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_car_in_use_and_delete() {
    let engine = sqlite_engine().await;
    let inventory = engine.inventory();

    engine
        .create_booking(&request("C002", CUSTOMER, 1))
        .await
        .unwrap();

    let err = inventory.delete_car("C002", OTHER_SELLER).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::CarInUse);
    assert_eq!(engine.store().count_bookings_for_car("C002").await.unwrap(), 1);
    assert_eq!(engine.store().count_bookings_for_car("C004").await.unwrap(), 0);

    inventory.delete_car("C004", ADMIN).await.unwrap();
    assert!(engine.store().get_car("C004").await.unwrap().is_none());

    let err = inventory.delete_car("C004", ADMIN).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_duplicate_username_any_case() {
    let engine = sqlite_engine().await;
    let accounts = engine.accounts();

    let err = accounts
        .register_user(&NewUser {
            username: "User@Demo".to_string(),
            role: Role::User,
            contact: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);
    assert!(matches!(err, EngineError::Domain(_)));

    let user = accounts
        .register_user(&NewUser {
            username: "newbie@demo".to_string(),
            role: Role::User,
            contact: Some("Customer 3".to_string()),
        })
        .await
        .unwrap();

    let booking = engine
        .create_booking(&request("C004", &user.id, 2))
        .await
        .unwrap();
    assert_eq!(booking.total_price, Money::from_major(13000));
}

#[tokio::test]
async fn test_open_from_config() {
    let mut config = RentalConfig::default();
    config.database.path = ":memory:".into();
    config.database.max_connections = 1;

    let engine = BookingEngine::open(&config).await.unwrap();
    assert!(engine.store().database().health_check().await);
    assert!(engine.store().list_users().await.unwrap().is_empty());
}
