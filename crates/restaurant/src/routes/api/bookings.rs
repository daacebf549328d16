//! Booking JSON API.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::{BookingRepository, RepositoryError};
use crate::error::Result;
use crate::forms::{BookingForm, BookingRequest, non_blank, parse_date};
use crate::state::AppState;

/// Query parameters for listing bookings.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Bookings on `?date=YYYY-MM-DD`, defaulting to today.
///
/// # Errors
///
/// Returns 500 if bookings cannot be loaded.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let date = match non_blank(query.date.as_deref()) {
        None => chrono::Local::now().date_naive(),
        Some(raw) => match parse_date(raw) {
            Some(date) => date,
            None => {
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    "date must be formatted as YYYY-MM-DD",
                ));
            }
        },
    };

    let bookings = BookingRepository::new(state.pool())
        .list_on(Some(date))
        .await?;
    Ok(Json(bookings).into_response())
}

/// Create a booking from a JSON body.
///
/// Answers 201 with the stored booking, 400 with per-field errors, or 409
/// when the slot on that date is already booked.
///
/// # Errors
///
/// Returns 500 if the booking cannot be stored.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Response> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Ok(error_response(StatusCode::BAD_REQUEST, &rejection.body_text()));
        }
    };

    let input = match BookingForm::from(request).validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok((StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response());
        }
    };

    match BookingRepository::new(state.pool()).create(&input).await {
        Ok(booking) => Ok((StatusCode::CREATED, Json(booking)).into_response()),
        Err(RepositoryError::Conflict(_)) => {
            Ok(error_response(StatusCode::CONFLICT, "Already booked"))
        }
        Err(e) => Err(e.into()),
    }
}
