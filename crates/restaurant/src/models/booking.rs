//! Table booking types.

use core::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use little_lemon_core::{BookingId, ReservationSlot};

/// A table reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Booking {
    pub id: BookingId,
    pub first_name: String,
    pub reservation_date: NaiveDate,
    pub reservation_slot: ReservationSlot,
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_name)
    }
}

/// Validated input for creating or updating a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub first_name: String,
    pub reservation_date: NaiveDate,
    pub reservation_slot: ReservationSlot,
}

impl NewBooking {
    /// Maximum length of `first_name`.
    pub const FIRST_NAME_MAX_LENGTH: usize = 200;
}
