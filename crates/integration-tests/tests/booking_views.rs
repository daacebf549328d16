//! Public booking form, reservations page and booking API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::json;

use little_lemon_core::ReservationSlot;
use little_lemon_integration_tests::TestApp;
use little_lemon_restaurant::db::BookingRepository;
use little_lemon_restaurant::forms::SLOT_TAKEN;
use little_lemon_restaurant::models::NewBooking;

async fn book(app: &TestApp, first_name: &str, day: &str, slot: i16) {
    BookingRepository::new(&app.pool)
        .create(&NewBooking {
            first_name: first_name.to_string(),
            reservation_date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
            reservation_slot: ReservationSlot::new(slot).unwrap(),
        })
        .await
        .unwrap();
}

async fn booking_count(app: &TestApp) -> i64 {
    BookingRepository::new(&app.pool).count().await.unwrap()
}

#[tokio::test]
async fn test_book_page_shows_empty_form() {
    let mut app = TestApp::restaurant().await;

    let response = app.get("/book/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<form"));
    assert!(response.body.contains("name=\"first_name\""));
}

#[tokio::test]
async fn test_valid_booking_is_stored() {
    let mut app = TestApp::restaurant().await;

    let response = app
        .post_form(
            "/book/",
            &[
                ("first_name", "John"),
                ("reservation_date", "2023-01-15"),
                ("reservation_slot", "10"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("form"));
    assert!(response.body.contains("Thank you, John."));
    assert_eq!(booking_count(&app).await, 1);

    let stored = BookingRepository::new(&app.pool).list(None).await.unwrap();
    assert_eq!(stored[0].first_name, "John");
    assert_eq!(stored[0].reservation_slot.get(), 10);
}

#[tokio::test]
async fn test_empty_booking_shows_errors_and_stores_nothing() {
    let mut app = TestApp::restaurant().await;

    let response = app.post_form("/book/", &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("form"));
    assert!(response.body.contains("This field is required."));
    assert_eq!(booking_count(&app).await, 0);
}

#[tokio::test]
async fn test_invalid_booking_keeps_submitted_values() {
    let mut app = TestApp::restaurant().await;

    let response = app
        .post_form(
            "/book/",
            &[
                ("first_name", "Ana"),
                ("reservation_date", "15/01/2023"),
                ("reservation_slot", "ten"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("value=\"Ana\""));
    assert!(response.body.contains("Please correct the errors below."));
    assert_eq!(booking_count(&app).await, 0);
}

#[tokio::test]
async fn test_booking_taken_slot_shows_error() {
    let mut app = TestApp::restaurant().await;
    book(&app, "John", "2023-01-15", 10).await;

    let response = app
        .post_form(
            "/book/",
            &[
                ("first_name", "Ana"),
                ("reservation_date", "2023-01-15"),
                ("reservation_slot", "10"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("value=\"Ana\""));
    assert!(response.body.contains(SLOT_TAKEN));
    assert!(!response.body.contains("Thank you"));
    assert_eq!(booking_count(&app).await, 1);

    let next_slot = app
        .post_form(
            "/book/",
            &[
                ("first_name", "Ana"),
                ("reservation_date", "2023-01-15"),
                ("reservation_slot", "11"),
            ],
        )
        .await;
    assert!(next_slot.body.contains("Thank you, Ana."));
    assert_eq!(booking_count(&app).await, 2);
}

#[tokio::test]
async fn test_reservations_filter_by_date() {
    let mut app = TestApp::restaurant().await;
    book(&app, "John", "2023-01-15", 10).await;
    book(&app, "Maria", "2023-01-15", 12).await;
    book(&app, "Omar", "2023-01-16", 10).await;

    let response = app.get("/reservations/?date=2023-01-15").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("bookings"));
    assert!(response.body.contains("John"));
    assert!(response.body.contains("Maria"));
    assert!(!response.body.contains("Omar"));

    let everything = app.get("/reservations/").await;
    assert!(everything.body.contains("Omar"));
    assert!(everything.body.contains("All bookings"));
}

#[tokio::test]
async fn test_reservations_ignore_malformed_date() {
    let mut app = TestApp::restaurant().await;
    book(&app, "John", "2023-01-15", 10).await;

    let response = app.get("/reservations/?date=yesterday").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("John"));
    assert!(response.body.contains("was ignored"));
}

#[tokio::test]
async fn test_api_rejects_double_booking() {
    let mut app = TestApp::restaurant().await;
    let request = json!({
        "first_name": "John",
        "reservation_date": "2023-01-15",
        "reservation_slot": 10,
    });

    let created = app.post_json("/api/bookings/", &request).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json()["first_name"], "John");

    let again = app.post_json("/api/bookings/", &request).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.json()["error"], "Already booked");

    let listed = app.get("/api/bookings/?date=2023-01-15").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json().as_array().unwrap().len(), 1);

    let bad = app.get("/api/bookings/?date=15-01-2023").await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}
