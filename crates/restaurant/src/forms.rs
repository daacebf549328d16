//! Form input handling and validation.
//!
//! Submitted fields arrive as optional strings so that missing and malformed
//! input can be reported per field instead of rejecting the whole request.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use little_lemon_core::{ReservationSlot, SlotError};

use crate::models::NewBooking;

/// Message shown for a missing required field.
pub const REQUIRED: &str = "This field is required.";

/// Message for a date that is not `YYYY-MM-DD`.
pub const INVALID_DATE: &str = "Enter a valid date.";

/// Message for a number field that is not an integer.
pub const NOT_A_WHOLE_NUMBER: &str = "Enter a whole number.";

/// Message for a slot outside `ReservationSlot::MIN..=ReservationSlot::MAX`.
pub const SLOT_OUT_OF_RANGE: &str = "Ensure this value is between 0 and 32767.";

/// Message when the date and slot already hold a booking.
pub const SLOT_TAKEN: &str = "This slot is already booked on that date.";

/// Validation messages keyed by field name.
///
/// Errors that concern the form as a whole use the key [`FieldErrors::FORM`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Key for errors that are not tied to a single field.
    pub const FORM: &'static str = "__all__";

    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for `field` (empty if none).
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Messages joined into one line, for templates.
    #[must_use]
    pub fn message(&self, field: &str) -> String {
        self.get(field).join(" ")
    }

    /// Whether `field` has any message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether no field has any message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Trim a submitted value, treating blank input as missing.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse an ISO `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Raw booking form submission.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub reservation_date: Option<String>,
    #[serde(default)]
    pub reservation_slot: Option<String>,
}

impl BookingForm {
    /// Validate every field, collecting all errors.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is missing or invalid.
    pub fn validate(&self) -> Result<NewBooking, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = match non_blank(self.first_name.as_deref()) {
            None => {
                errors.add("first_name", REQUIRED);
                None
            }
            Some(name) if name.chars().count() > NewBooking::FIRST_NAME_MAX_LENGTH => {
                errors.add(
                    "first_name",
                    format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        NewBooking::FIRST_NAME_MAX_LENGTH,
                        name.chars().count()
                    ),
                );
                None
            }
            Some(name) => Some(name.to_owned()),
        };

        let reservation_date = match non_blank(self.reservation_date.as_deref()) {
            None => {
                errors.add("reservation_date", REQUIRED);
                None
            }
            Some(raw) => {
                let date = parse_date(raw);
                if date.is_none() {
                    errors.add("reservation_date", INVALID_DATE);
                }
                date
            }
        };

        let reservation_slot = match self
            .reservation_slot
            .as_deref()
            .unwrap_or_default()
            .parse::<ReservationSlot>()
        {
            Ok(slot) => Some(slot),
            Err(SlotError::Empty) => {
                errors.add("reservation_slot", REQUIRED);
                None
            }
            Err(SlotError::NotANumber) => {
                errors.add("reservation_slot", NOT_A_WHOLE_NUMBER);
                None
            }
            Err(SlotError::OutOfRange { .. }) => {
                errors.add("reservation_slot", SLOT_OUT_OF_RANGE);
                None
            }
        };

        match (first_name, reservation_date, reservation_slot) {
            (Some(first_name), Some(reservation_date), Some(reservation_slot))
                if errors.is_empty() =>
            {
                Ok(NewBooking {
                    first_name,
                    reservation_date,
                    reservation_slot,
                })
            }
            _ => Err(errors),
        }
    }

    /// Submitted values to echo back into a re-rendered form.
    #[must_use]
    pub fn values(&self) -> BookingFormValues {
        BookingFormValues {
            first_name: self.first_name.clone().unwrap_or_default(),
            reservation_date: self.reservation_date.clone().unwrap_or_default(),
            reservation_slot: self.reservation_slot.clone().unwrap_or_default(),
        }
    }
}

/// Booking request body for the JSON API, where the slot is a number.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub reservation_date: Option<String>,
    #[serde(default)]
    pub reservation_slot: Option<i64>,
}

impl From<BookingRequest> for BookingForm {
    fn from(request: BookingRequest) -> Self {
        Self {
            first_name: request.first_name,
            reservation_date: request.reservation_date,
            reservation_slot: request.reservation_slot.map(|slot| slot.to_string()),
        }
    }
}

/// Field values as shown in the booking form inputs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookingFormValues {
    pub first_name: String,
    pub reservation_date: String,
    pub reservation_slot: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(first_name: &str, date: &str, slot: &str) -> BookingForm {
        BookingForm {
            first_name: Some(first_name.to_string()),
            reservation_date: Some(date.to_string()),
            reservation_slot: Some(slot.to_string()),
        }
    }

    #[test]
    fn test_valid_booking() {
        let booking = form(" John ", "2023-01-15", "10").validate().unwrap();
        assert_eq!(booking.first_name, "John");
        assert_eq!(
            booking.reservation_date,
            NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
        );
        assert_eq!(booking.reservation_slot.get(), 10);
    }

    #[test]
    fn test_empty_submission_flags_every_field() {
        let errors = BookingForm::default().validate().unwrap_err();
        assert_eq!(errors.get("first_name"), [REQUIRED]);
        assert_eq!(errors.get("reservation_date"), [REQUIRED]);
        assert_eq!(errors.get("reservation_slot"), [REQUIRED]);
    }

    #[test]
    fn test_malformed_values() {
        let errors = form("John", "15/01/2023", "ten").validate().unwrap_err();
        assert!(!errors.has("first_name"));
        assert_eq!(errors.message("reservation_date"), INVALID_DATE);
        assert_eq!(errors.message("reservation_slot"), NOT_A_WHOLE_NUMBER);

        let errors = form("John", "2023-02-30", "-1").validate().unwrap_err();
        assert!(errors.has("reservation_date"));
        assert_eq!(errors.message("reservation_slot"), SLOT_OUT_OF_RANGE);

        let errors = form("John", "2023-01-15", "32768").validate().unwrap_err();
        assert_eq!(errors.get("reservation_slot"), [SLOT_OUT_OF_RANGE]);
    }

    #[test]
    fn test_first_name_length_limit() {
        let long = "a".repeat(201);
        let errors = form(&long, "2023-01-15", "10").validate().unwrap_err();
        assert!(errors.message("first_name").contains("at most 200"));
        assert!(form(&"a".repeat(200), "2023-01-15", "10").validate().is_ok());
    }

    #[test]
    fn test_json_request_converts_slot() {
        let request: BookingRequest = serde_json::from_str(
            r#"{"first_name": "John", "reservation_date": "2023-01-15", "reservation_slot": 10}"#,
        )
        .unwrap();
        let booking = BookingForm::from(request).validate().unwrap();
        assert_eq!(booking.reservation_slot.get(), 10);
    }

    #[test]
    fn test_values_echo_input() {
        let values = form("John", "bad", "x").values();
        assert_eq!(values.reservation_date, "bad");
        assert_eq!(BookingForm::default().values(), BookingFormValues::default());
    }
}
