//! Table booking and reservation list route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Form, Query, State, rejection::FormRejection};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use crate::db::{BookingRepository, RepositoryError};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::forms::{BookingForm, BookingFormValues, FieldErrors, SLOT_TAKEN, parse_date};
use crate::models::Booking;
use crate::state::AppState;

/// Booking form page template.
#[derive(Template, WebTemplate)]
#[template(path = "book.html")]
pub struct BookTemplate {
    pub values: BookingFormValues,
    pub errors: FieldErrors,
    /// The booking just stored, shown as a confirmation.
    pub saved: Option<Booking>,
}

impl BookTemplate {
    fn blank() -> Self {
        Self {
            values: BookingFormValues::default(),
            errors: FieldErrors::new(),
            saved: None,
        }
    }
}

/// Reservations page template.
#[derive(Template, WebTemplate)]
#[template(path = "bookings.html")]
pub struct ReservationsTemplate {
    pub bookings: Vec<Booking>,
    pub date: Option<NaiveDate>,
    /// Raw `date` value that could not be parsed and was ignored.
    pub ignored_date: Option<String>,
}

/// Query parameters for the reservations page.
#[derive(Debug, Deserialize)]
pub struct ReservationsQuery {
    pub date: Option<String>,
}

/// Display an empty booking form.
#[instrument]
pub async fn book_page() -> BookTemplate {
    BookTemplate::blank()
}

/// Handle a booking form submission.
///
/// Valid input is stored and answered with a fresh form plus a
/// confirmation. Invalid input re-renders the form with the submitted
/// values and per-field errors, as does a date and slot that is already
/// booked.
///
/// # Errors
///
/// Returns 500 if the booking cannot be stored.
#[instrument(skip(state, form))]
pub async fn book(
    State(state): State<AppState>,
    form: std::result::Result<Form<BookingForm>, FormRejection>,
) -> Result<BookTemplate> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable booking form body");
            BookingForm::default()
        }
    };

    let errors = match form.validate() {
        Ok(input) => match BookingRepository::new(state.pool()).create(&input).await {
            Ok(booking) => {
                add_breadcrumb("booking", &format!("Booked table for {booking}"));
                return Ok(BookTemplate {
                    saved: Some(booking),
                    ..BookTemplate::blank()
                });
            }
            Err(RepositoryError::Conflict(_)) => {
                let mut errors = FieldErrors::new();
                errors.add("reservation_slot", SLOT_TAKEN);
                errors
            }
            Err(e) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    tracing::debug!(?errors, "Booking form rejected");
    Ok(BookTemplate {
        values: form.values(),
        errors,
        saved: None,
    })
}

/// Display bookings, restricted to `?date=YYYY-MM-DD` when it parses.
///
/// # Errors
///
/// Returns 500 if bookings cannot be loaded.
#[instrument(skip(state))]
pub async fn reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationsQuery>,
) -> Result<ReservationsTemplate> {
    let (date, ignored_date) = match query.date {
        None => (None, None),
        Some(raw) => match parse_date(&raw) {
            Some(date) => (Some(date), None),
            None => {
                tracing::debug!(date = %raw, "Ignoring malformed reservation date");
                (None, Some(raw))
            }
        },
    };

    let bookings = BookingRepository::new(state.pool()).list_on(date).await?;
    Ok(ReservationsTemplate {
        bookings,
        date,
        ignored_date,
    })
}
