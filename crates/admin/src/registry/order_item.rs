//! Order lines.

use sqlx::SqlitePool;

use little_lemon_core::{MenuItemId, OrderId, OrderItemId};
use little_lemon_restaurant::db::{OrderItemRepository, RepositoryError};
use little_lemon_restaurant::forms::FieldErrors;
use little_lemon_restaurant::models::NewOrderItem;

use super::{
    Cell, Instance, ListRow, SaveOutcome, Saved, conflict_as_form_error, menu_item_options,
    order_options,
};
use crate::components::{DataTableConfig, TableColumn};
use crate::forms::{FormData, FormField, Validator};

pub(super) fn table() -> DataTableConfig {
    DataTableConfig::new("orderitem")
        .column(TableColumn::new("order", "Order"))
        .column(TableColumn::new("menuitem", "Menu item"))
        .column(TableColumn::new("price", "Price"))
        .empty_state("No order items")
}

pub(super) async fn rows(pool: &SqlitePool) -> Result<Vec<ListRow>, RepositoryError> {
    let lines = OrderItemRepository::new(pool).list().await?;
    Ok(lines
        .into_iter()
        .map(|line| {
            let cells = vec![
                Cell::text(format!("Order #{}", line.item.order_id)),
                Cell::text(&line.menuitem_title),
                Cell::text(line.item.price),
            ];
            ListRow::new(line.item.id, &line, cells)
        })
        .collect())
}

pub(super) async fn fields(pool: &SqlitePool) -> Result<Vec<FormField>, RepositoryError> {
    Ok(vec![
        FormField::select("order", "Order", order_options(pool).await?),
        FormField::select("menuitem", "Menu item", menu_item_options(pool).await?),
        FormField::number("quantity", "Quantity"),
        FormField::decimal("price", "Price"),
    ])
}

pub(super) async fn instance(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Instance>, RepositoryError> {
    let line = OrderItemRepository::new(pool)
        .get_line(OrderItemId::new(id))
        .await?;
    Ok(line.map(|line| Instance {
        display: line.to_string(),
        data: FormData::new()
            .with("order", line.item.order_id)
            .with("menuitem", line.item.menuitem_id)
            .with("quantity", line.item.quantity)
            .with("price", line.item.price),
    }))
}

fn validate(data: &FormData) -> Result<NewOrderItem, FieldErrors> {
    let mut v = Validator::new(data);
    let order_id = v.id("order");
    let menuitem_id = v.id("menuitem");
    let quantity = v.quantity("quantity");
    let price = v.price("price");
    let value = order_id.zip(menuitem_id).zip(quantity).zip(price);
    v.finish(value)
        .map(|(((order_id, menuitem_id), quantity), price)| NewOrderItem {
            order_id: OrderId::new(order_id),
            menuitem_id: MenuItemId::new(menuitem_id),
            quantity,
            price,
        })
}

pub(super) async fn save(pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
    let input = match validate(data) {
        Ok(input) => input,
        Err(errors) => return Ok(Err(errors)),
    };
    let repo = OrderItemRepository::new(pool);
    let result = match id {
        None => repo.create(&input).await,
        Some(id) => repo.update(OrderItemId::new(id), &input).await,
    };
    let item = match conflict_as_form_error(result)? {
        Ok(item) => item,
        Err(errors) => return Ok(Err(errors)),
    };
    let display = repo
        .get_line(item.id)
        .await?
        .map_or_else(|| format!("Order #{}", item.order_id), |line| line.to_string());
    Ok(Ok(Saved::new(item.id, display)))
}
