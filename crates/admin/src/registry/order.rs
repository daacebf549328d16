//! Orders. The delivery status is edited in place on the change list.

use sqlx::SqlitePool;

use little_lemon_core::{OrderId, OrderStatus, Price, UserId};
use little_lemon_restaurant::db::{OrderRepository, RepositoryError};
use little_lemon_restaurant::forms::FieldErrors;
use little_lemon_restaurant::models::NewOrder;

use super::{Cell, Instance, ListRow, SaveOutcome, Saved, conflict_as_form_error, user_options};
use crate::components::{DataTableConfig, TableColumn};
use crate::forms::{FormData, FormField, SelectOption, Validator};

const STATUS_INPUT: &str = "status";

pub(super) fn table() -> DataTableConfig {
    DataTableConfig::new("order")
        .column(TableColumn::new("user", "User"))
        .column(TableColumn::new("delivery_crew", "Delivery crew"))
        .column(TableColumn::editable(STATUS_INPUT, "Status"))
        .column(TableColumn::new("total", "Total"))
        .column(TableColumn::new("date", "Date"))
        .empty_state("No orders yet")
}

fn status_input() -> FormField {
    let options = OrderStatus::ALL
        .into_iter()
        .map(|status| SelectOption::new(status.as_str(), status.label()))
        .collect();
    FormField::select(STATUS_INPUT, "Status", options)
}

pub(super) async fn rows(pool: &SqlitePool) -> Result<Vec<ListRow>, RepositoryError> {
    let lines = OrderRepository::new(pool).list().await?;
    Ok(lines
        .into_iter()
        .map(|line| {
            let id = line.order.id.as_i64();
            let crew = line
                .delivery_crew_username
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            let mut status = Cell::editable(status_input(), id, line.order.status.as_str());
            status.text = line.order.status.label().to_string();
            let cells = vec![
                Cell::text(&line.username),
                Cell::text(crew),
                status,
                Cell::text(line.order.total),
                Cell::text(line.order.date),
            ];
            ListRow::new(id, &line.order, cells)
        })
        .collect())
}

pub(super) async fn fields(pool: &SqlitePool) -> Result<Vec<FormField>, RepositoryError> {
    let users = user_options(pool).await?;
    Ok(vec![
        FormField::select("user", "User", users.clone()),
        FormField::select("delivery_crew", "Delivery crew", users).optional(),
        status_input(),
        FormField::decimal("total", "Total"),
        FormField::date("date", "Date"),
    ])
}

pub(super) fn defaults() -> FormData {
    FormData::new()
        .with(STATUS_INPUT, OrderStatus::Pending.as_str())
        .with("total", Price::ZERO)
        .with("date", chrono::Local::now().date_naive())
}

pub(super) async fn instance(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Instance>, RepositoryError> {
    let order = OrderRepository::new(pool).get(OrderId::new(id)).await?;
    Ok(order.map(|order| {
        let mut data = FormData::new()
            .with("user", order.user_id)
            .with(STATUS_INPUT, order.status.as_str())
            .with("total", order.total)
            .with("date", order.date);
        if let Some(crew) = order.delivery_crew_id {
            data.insert("delivery_crew", crew);
        }
        Instance {
            display: order.to_string(),
            data,
        }
    }))
}

fn validate(data: &FormData) -> Result<NewOrder, FieldErrors> {
    let mut v = Validator::new(data);
    let user_id = v.id("user");
    let delivery_crew_id = v.optional_id("delivery_crew");
    let status = v.status(STATUS_INPUT);
    let total = v.price("total");
    let date = v.date("date");
    let value = user_id
        .zip(delivery_crew_id)
        .zip(status)
        .zip(total)
        .zip(date);
    v.finish(value)
        .map(|((((user_id, delivery_crew_id), status), total), date)| NewOrder {
            user_id: UserId::new(user_id),
            delivery_crew_id: delivery_crew_id.map(UserId::new),
            status,
            total,
            date,
        })
}

pub(super) async fn save(pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
    let input = match validate(data) {
        Ok(input) => input,
        Err(errors) => return Ok(Err(errors)),
    };
    let repo = OrderRepository::new(pool);
    let result = match id {
        None => repo.create(&input).await,
        Some(id) => repo.update(OrderId::new(id), &input).await,
    };
    Ok(conflict_as_form_error(result)?.map(|order| Saved::new(order.id, &order)))
}

/// Save every `status-<id>` select of the change list.
pub(super) async fn save_list(pool: &SqlitePool, data: &FormData) -> SaveOutcome<usize> {
    let prefix = format!("{STATUS_INPUT}-");
    let mut v = Validator::new(data);
    let mut updates = Vec::new();
    for (id, _) in data.with_prefix(&prefix) {
        let name = format!("{prefix}{id}");
        let Ok(id) = id.parse::<i64>() else {
            v.error(&name, "Invalid row.");
            continue;
        };
        if let Some(status) = v.status(&name) {
            updates.push((OrderId::new(id), status));
        }
    }
    let updates = match v.finish(Some(updates)) {
        Ok(updates) => updates,
        Err(errors) => return Ok(Err(errors)),
    };

    let repo = OrderRepository::new(pool);
    for (id, status) in &updates {
        repo.set_status(*id, *status).await?;
    }
    Ok(Ok(updates.len()))
}
