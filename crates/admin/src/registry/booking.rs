//! Table bookings.

use sqlx::SqlitePool;

use little_lemon_core::BookingId;
use little_lemon_restaurant::db::{BookingRepository, RepositoryError};
use little_lemon_restaurant::forms::FieldErrors;
use little_lemon_restaurant::models::NewBooking;

use super::{Cell, Instance, ListQuery, ListRow, SaveOutcome, Saved, conflict_as_form_error};
use crate::components::{DataTableConfig, TableColumn};
use crate::forms::{FormData, FormField, Validator};

/// Slot preselected on a new booking.
const DEFAULT_SLOT: i16 = 10;

pub(super) fn table() -> DataTableConfig {
    DataTableConfig::new("booking")
        .column(TableColumn::new("first_name", "First name"))
        .column(TableColumn::new("reservation_date", "Reservation date"))
        .column(TableColumn::new("reservation_slot", "Reservation slot"))
        .search_placeholder("Search by first name or date")
        .empty_state("No bookings yet")
}

pub(super) async fn rows(
    pool: &SqlitePool,
    query: &ListQuery,
) -> Result<Vec<ListRow>, RepositoryError> {
    let bookings = BookingRepository::new(pool).list(query.search()).await?;
    Ok(bookings
        .into_iter()
        .map(|booking| {
            let cells = vec![
                Cell::text(&booking.first_name),
                Cell::text(booking.reservation_date),
                Cell::text(booking.reservation_slot),
            ];
            ListRow::new(booking.id, &booking, cells)
        })
        .collect())
}

pub(super) fn fields() -> Vec<FormField> {
    vec![
        FormField::text("first_name", "First name", NewBooking::FIRST_NAME_MAX_LENGTH),
        FormField::date("reservation_date", "Reservation date"),
        FormField::number("reservation_slot", "Reservation slot"),
    ]
}

pub(super) fn defaults() -> FormData {
    FormData::new().with("reservation_slot", DEFAULT_SLOT)
}

pub(super) async fn instance(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Instance>, RepositoryError> {
    let booking = BookingRepository::new(pool).get(BookingId::new(id)).await?;
    Ok(booking.map(|booking| Instance {
        display: booking.to_string(),
        data: FormData::new()
            .with("first_name", &booking.first_name)
            .with("reservation_date", booking.reservation_date)
            .with("reservation_slot", booking.reservation_slot),
    }))
}

fn validate(data: &FormData) -> Result<NewBooking, FieldErrors> {
    let mut v = Validator::new(data);
    let first_name = v.text("first_name", NewBooking::FIRST_NAME_MAX_LENGTH);
    let reservation_date = v.date("reservation_date");
    let reservation_slot = v.slot("reservation_slot");
    let value = first_name.zip(reservation_date).zip(reservation_slot);
    v.finish(value)
        .map(|((first_name, reservation_date), reservation_slot)| NewBooking {
            first_name,
            reservation_date,
            reservation_slot,
        })
}

pub(super) async fn save(pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
    let input = match validate(data) {
        Ok(input) => input,
        Err(errors) => return Ok(Err(errors)),
    };
    let repo = BookingRepository::new(pool);
    let result = match id {
        None => repo.create(&input).await,
        Some(id) => repo.update(BookingId::new(id), &input).await,
    };
    Ok(conflict_as_form_error(result)?.map(|booking| Saved::new(booking.id, &booking)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::pool;
    use super::*;

    #[tokio::test]
    async fn test_change_form_round_trips_stored_values() {
        let pool = pool().await;
        let data = FormData::new()
            .with("first_name", "John")
            .with("reservation_date", "2023-01-15")
            .with("reservation_slot", "10");
        let saved = save(&pool, None, &data).await.unwrap().unwrap();
        assert_eq!(saved.display, "John");

        let loaded = instance(&pool, saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, data);

        let changed = data.with("reservation_slot", "12");
        save(&pool, Some(saved.id), &changed).await.unwrap().unwrap();
        let loaded = instance(&pool, saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.data.get("reservation_slot"), Some("12"));
    }

    #[tokio::test]
    async fn test_taken_slot_is_a_form_error() {
        let pool = pool().await;
        let data = FormData::new()
            .with("first_name", "John")
            .with("reservation_date", "2023-01-15")
            .with("reservation_slot", "10");
        save(&pool, None, &data).await.unwrap().unwrap();

        let again = data.with("first_name", "Maria");
        let errors = save(&pool, None, &again).await.unwrap().unwrap_err();
        assert_eq!(
            errors.message(FieldErrors::FORM),
            "This slot is already booked on that date."
        );
        assert_eq!(BookingRepository::new(&pool).count().await.unwrap(), 1);
    }

    #[test]
    fn test_slot_must_be_in_range() {
        let data = FormData::new()
            .with("first_name", "John")
            .with("reservation_date", "2023-01-15")
            .with("reservation_slot", "40000");
        let errors = validate(&data).unwrap_err();
        assert!(errors.has("reservation_slot"));
        assert_eq!(defaults().get("reservation_slot"), Some("10"));
    }
}
