//! JSON API route handlers.

pub mod bookings;
