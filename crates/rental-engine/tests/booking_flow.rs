//! End-to-end booking lifecycle against the in-memory store.

mod common;

use common::*;
use rental_core::{BookingStatus, CarDraft, CarStatus, Money};
use rental_engine::{ApiError, EntityStore, ErrorCode};

#[tokio::test]
async fn test_request_is_priced_and_pending() {
    let engine = memory_engine();

    let booking = engine
        .create_booking(&request("C001", CUSTOMER, 3))
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_price, Money::from_major(10500));
    assert_eq!(booking.days, 3);
    assert!(booking.decided_at.is_none());

    let car = engine.store().get_car("C001").await.unwrap().unwrap();
    assert_eq!(car.status, CarStatus::Available);
}

#[tokio::test]
async fn test_owner_approval_rents_car() {
    let engine = memory_engine();
    let booking = engine
        .create_booking(&request("C001", CUSTOMER, 3))
        .await
        .unwrap();

    let confirmed = engine.approve_booking(&booking.id, SELLER).await.unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert!(confirmed.decided_at.is_some());

    let car = engine.store().get_car("C001").await.unwrap().unwrap();
    assert_eq!(car.status, CarStatus::Rented);

    let stored = engine.get_booking(&booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_other_seller_is_forbidden() {
    let engine = memory_engine();
    let booking = engine
        .create_booking(&request("C001", CUSTOMER, 3))
        .await
        .unwrap();

    let err = engine
        .approve_booking(&booking.id, OTHER_SELLER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let err = engine
        .reject_booking(&booking.id, OTHER_SELLER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    // Customers cannot decide either
    let err = engine
        .approve_booking(&booking.id, CUSTOMER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let stored = engine.get_booking(&booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
    let car = engine.store().get_car("C001").await.unwrap().unwrap();
    assert_eq!(car.status, CarStatus::Available);
}

#[tokio::test]
async fn test_rented_car_cannot_be_requested() {
    let engine = memory_engine();
    engine
        .set_car_status("C001", CarStatus::Rented, SELLER)
        .await
        .unwrap();

    let err = engine
        .create_booking(&request("C001", CUSTOMER, 3))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAvailable);

    engine.mark_sold("C003", SELLER).await.unwrap();
    let err = engine
        .create_booking(&request("C003", CUSTOMER, 1))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAvailable);
}

#[tokio::test]
async fn test_invalid_days() {
    let engine = memory_engine();

    for days in [0, -2, 31] {
        let err = engine
            .create_booking(&request("C001", CUSTOMER, days))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput, "days = {}", days);
    }

    let mut blank_place = request("C001", CUSTOMER, 2);
    blank_place.pickup_place = "   ".to_string();
    let err = engine.create_booking(&blank_place).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);

    assert!(engine.bookings_for_user(CUSTOMER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_approval_is_invalid_transition() {
    let engine = memory_engine();
    let booking = engine
        .create_booking(&request("C001", CUSTOMER, 2))
        .await
        .unwrap();

    engine.approve_booking(&booking.id, SELLER).await.unwrap();
    let err = engine.approve_booking(&booking.id, SELLER).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);

    let err = engine.reject_booking(&booking.id, ADMIN).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_reject_leaves_car_alone() {
    let engine = memory_engine();
    let booking = engine
        .create_booking(&request("C002", CUSTOMER, 4))
        .await
        .unwrap();

    let rejected = engine.reject_booking(&booking.id, OTHER_SELLER).await.unwrap();
    assert_eq!(rejected.status, BookingStatus::Rejected);

    let car = engine.store().get_car("C002").await.unwrap().unwrap();
    assert_eq!(car.status, CarStatus::Available);

    let err = engine
        .approve_booking(&booking.id, OTHER_SELLER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_admin_decides_any_booking() {
    let engine = memory_engine();
    let a = engine
        .create_booking(&request("C002", CUSTOMER, 1))
        .await
        .unwrap();
    let b = engine
        .create_booking(&request("C004", OTHER_CUSTOMER, 1))
        .await
        .unwrap();

    engine.approve_booking(&a.id, ADMIN).await.unwrap();
    engine.reject_booking(&b.id, ADMIN).await.unwrap();
    engine.mark_sold("C003", ADMIN).await.unwrap();
}

#[tokio::test]
async fn test_total_is_frozen_at_creation() {
    let engine = memory_engine();
    let booking = engine
        .create_booking(&request("C001", CUSTOMER, 3))
        .await
        .unwrap();

    let car = engine.inventory().get_car("C001").await.unwrap();
    let draft = CarDraft {
        name: car.name.clone(),
        model: car.model.clone(),
        category: car.category.clone(),
        fuel_type: car.fuel_type.clone(),
        seats: car.seats,
        transmission: car.transmission.clone(),
        price_per_day: Money::from_major(5000),
        image_path: car.image_path.clone(),
        owner_id: None,
    };
    engine
        .inventory()
        .update_car("C001", &draft, SELLER)
        .await
        .unwrap();

    let stored = engine.get_booking(&booking.id).await.unwrap();
    assert_eq!(stored.total_price, Money::from_major(10500));

    let confirmed = engine.approve_booking(&booking.id, SELLER).await.unwrap();
    assert_eq!(confirmed.total_price, Money::from_major(10500));

    let later = engine
        .create_booking(&request("C003", CUSTOMER, 3))
        .await
        .unwrap();
    assert_eq!(later.total_price, Money::from_major(21000));
}

#[tokio::test]
async fn test_competing_requests_for_one_car() {
    let engine = memory_engine();
    let first = engine
        .create_booking(&request("C001", CUSTOMER, 2))
        .await
        .unwrap();
    let second = engine
        .create_booking(&request("C001", OTHER_CUSTOMER, 5))
        .await
        .unwrap();

    assert_eq!(engine.pending_count_for_owner(SELLER).await.unwrap(), 2);

    engine.approve_booking(&first.id, SELLER).await.unwrap();

    let err = engine.approve_booking(&second.id, SELLER).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAvailable);
    assert_eq!(
        engine.get_booking(&second.id).await.unwrap().status,
        BookingStatus::Pending
    );

    let rejected = engine.reject_booking(&second.id, SELLER).await.unwrap();
    assert_eq!(rejected.status, BookingStatus::Rejected);
    assert_eq!(engine.pending_count_for_owner(SELLER).await.unwrap(), 0);
}

#[tokio::test]
async fn test_pending_queue_per_owner() {
    let engine = memory_engine();
    engine
        .create_booking(&request("C001", CUSTOMER, 1))
        .await
        .unwrap();
    engine
        .create_booking(&request("C003", OTHER_CUSTOMER, 1))
        .await
        .unwrap();
    engine
        .create_booking(&request("C002", CUSTOMER, 1))
        .await
        .unwrap();

    let queue = engine.list_pending_for_owner(SELLER).await.unwrap();
    assert_eq!(queue.len(), 2);
    assert!(queue.iter().all(|b| b.car_id == "C001" || b.car_id == "C003"));

    assert_eq!(engine.pending_count_for_owner(OTHER_SELLER).await.unwrap(), 1);
    assert_eq!(engine.pending_count_for_owner("U006").await.unwrap(), 0);
}

#[tokio::test]
async fn test_bookings_for_actor() {
    let engine = memory_engine();
    engine
        .create_booking(&request("C001", CUSTOMER, 1))
        .await
        .unwrap();
    engine
        .create_booking(&request("C002", OTHER_CUSTOMER, 1))
        .await
        .unwrap();
    engine
        .create_booking(&request("C004", CUSTOMER, 1))
        .await
        .unwrap();

    assert_eq!(engine.bookings_for_actor(ADMIN).await.unwrap().len(), 3);
    assert_eq!(engine.bookings_for_actor(SELLER).await.unwrap().len(), 1);
    assert_eq!(engine.bookings_for_actor(CUSTOMER).await.unwrap().len(), 2);
    assert_eq!(engine.bookings_for_user(OTHER_CUSTOMER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let engine = memory_engine();

    let err = engine
        .create_booking(&request("C404", CUSTOMER, 1))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = engine.approve_booking("B404", SELLER).await.unwrap_err();
    assert!(err.is_not_found());

    let booking = engine
        .create_booking(&request("C001", CUSTOMER, 1))
        .await
        .unwrap();
    let err = engine.approve_booking(&booking.id, "U404").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_api_error_shape() {
    let engine = memory_engine();
    let err = engine
        .create_booking(&request("C001", CUSTOMER, 0))
        .await
        .unwrap_err();

    let api = ApiError::from(err);
    let json = serde_json::to_value(&api).unwrap();
    assert_eq!(json["code"], "INVALID_INPUT");
    assert!(json["message"].as_str().unwrap().contains("days"));
}
