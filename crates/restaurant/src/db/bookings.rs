//! Booking repository for database operations.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use little_lemon_core::BookingId;

use super::RepositoryError;
use crate::models::{Booking, NewBooking};

/// Conflict message when the date and slot already hold a booking.
pub const SLOT_TAKEN: &str = "this slot is already booked on that date";

/// Repository for table booking database operations.
pub struct BookingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookingRepository<'a> {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Bookings ordered by date then slot, optionally restricted to one date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_on(&self, date: Option<NaiveDate>) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r"
            SELECT id, first_name, reservation_date, reservation_slot
            FROM bookings
            WHERE ?1 IS NULL OR reservation_date = ?1
            ORDER BY reservation_date, reservation_slot, id
            ",
        )
        .bind(date)
        .fetch_all(self.pool)
        .await?;
        Ok(bookings)
    }

    /// Bookings newest first; `search` matches first name or ISO date text.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r"
            SELECT id, first_name, reservation_date, reservation_slot
            FROM bookings
            WHERE ?1 IS NULL
               OR instr(lower(first_name), lower(?1)) > 0
               OR instr(reservation_date, ?1) > 0
            ORDER BY id DESC
            ",
        )
        .bind(search)
        .fetch_all(self.pool)
        .await?;
        Ok(bookings)
    }

    /// Get a booking by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT id, first_name, reservation_date, reservation_slot FROM bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(booking)
    }

    /// Create a booking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slot on that date is taken.
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewBooking) -> Result<Booking, RepositoryError> {
        let booking = sqlx::query_as::<_, Booking>(
            r"
            INSERT INTO bookings (first_name, reservation_date, reservation_slot)
            VALUES (?, ?, ?)
            RETURNING id, first_name, reservation_date, reservation_slot
            ",
        )
        .bind(&input.first_name)
        .bind(input.reservation_date)
        .bind(input.reservation_slot)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, SLOT_TAKEN))?;

        tracing::info!(
            booking_id = %booking.id,
            date = %booking.reservation_date,
            slot = %booking.reservation_slot,
            "Booking created"
        );
        Ok(booking)
    }

    /// Update a booking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the booking doesn't exist.
    /// Returns `RepositoryError::Conflict` if the slot on that date is taken.
    pub async fn update(&self, id: BookingId, input: &NewBooking) -> Result<Booking, RepositoryError> {
        sqlx::query_as::<_, Booking>(
            r"
            UPDATE bookings SET first_name = ?, reservation_date = ?, reservation_slot = ?
            WHERE id = ?
            RETURNING id, first_name, reservation_date, reservation_slot
            ",
        )
        .bind(&input.first_name)
        .bind(input.reservation_date)
        .bind(input.reservation_slot)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, SLOT_TAKEN))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a booking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the booking doesn't exist.
    pub async fn delete(&self, id: BookingId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all bookings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
