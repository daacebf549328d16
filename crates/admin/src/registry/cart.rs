//! Cart lines: one row per (user, menu item).

use sqlx::SqlitePool;

use little_lemon_core::{CartId, MenuItemId, UserId};
use little_lemon_restaurant::db::{CartRepository, RepositoryError};
use little_lemon_restaurant::forms::FieldErrors;
use little_lemon_restaurant::models::{CartLine, NewCart};

use super::{
    Cell, Instance, ListRow, SaveOutcome, Saved, conflict_as_form_error, menu_item_options,
    user_options,
};
use crate::components::{DataTableConfig, TableColumn};
use crate::forms::{FormData, FormField, Validator};

pub(super) fn table() -> DataTableConfig {
    DataTableConfig::new("cart")
        .column(TableColumn::new("user", "User"))
        .column(TableColumn::new("menuitem", "Menu item"))
        .column(TableColumn::new("quantity", "Quantity"))
        .column(TableColumn::new("unit_price", "Unit price"))
        .column(TableColumn::new("price", "Price"))
        .empty_state("No cart lines")
}

pub(super) async fn rows(pool: &SqlitePool) -> Result<Vec<ListRow>, RepositoryError> {
    let lines = CartRepository::new(pool).list().await?;
    Ok(lines
        .into_iter()
        .map(|line| {
            let cells = vec![
                Cell::text(&line.username),
                Cell::text(&line.menuitem_title),
                Cell::text(line.cart.quantity),
                Cell::text(line.cart.unit_price),
                Cell::text(line.cart.price),
            ];
            ListRow::new(line.cart.id, &line, cells)
        })
        .collect())
}

pub(super) async fn fields(pool: &SqlitePool) -> Result<Vec<FormField>, RepositoryError> {
    Ok(vec![
        FormField::select("user", "User", user_options(pool).await?),
        FormField::select("menuitem", "Menu item", menu_item_options(pool).await?),
        FormField::number("quantity", "Quantity"),
        FormField::decimal("unit_price", "Unit price"),
        FormField::decimal("price", "Price"),
    ])
}

fn form_data(line: &CartLine) -> FormData {
    FormData::new()
        .with("user", line.cart.user_id)
        .with("menuitem", line.cart.menuitem_id)
        .with("quantity", line.cart.quantity)
        .with("unit_price", line.cart.unit_price)
        .with("price", line.cart.price)
}

pub(super) async fn instance(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Instance>, RepositoryError> {
    let line = CartRepository::new(pool).get_line(CartId::new(id)).await?;
    Ok(line.map(|line| Instance {
        display: line.to_string(),
        data: form_data(&line),
    }))
}

fn validate(data: &FormData) -> Result<NewCart, FieldErrors> {
    let mut v = Validator::new(data);
    let user_id = v.id("user");
    let menuitem_id = v.id("menuitem");
    let quantity = v.quantity("quantity");
    let unit_price = v.price("unit_price");
    let price = v.price("price");
    let value = user_id
        .zip(menuitem_id)
        .zip(quantity)
        .zip(unit_price)
        .zip(price);
    v.finish(value)
        .map(|((((user_id, menuitem_id), quantity), unit_price), price)| NewCart {
            user_id: UserId::new(user_id),
            menuitem_id: MenuItemId::new(menuitem_id),
            quantity,
            unit_price,
            price,
        })
}

pub(super) async fn save(pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
    let input = match validate(data) {
        Ok(input) => input,
        Err(errors) => return Ok(Err(errors)),
    };
    let repo = CartRepository::new(pool);
    let result = match id {
        None => repo.create(&input).await,
        Some(id) => repo.update(CartId::new(id), &input).await,
    };
    let cart = match conflict_as_form_error(result)? {
        Ok(cart) => cart,
        Err(errors) => return Ok(Err(errors)),
    };
    let display = repo
        .get_line(cart.id)
        .await?
        .map_or_else(|| format!("Cart #{}", cart.id), |line| line.to_string());
    Ok(Ok(Saved::new(cart.id, display)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use little_lemon_core::{Price, Slug, Username};
    use little_lemon_restaurant::db::{CategoryRepository, MenuItemRepository, UserRepository};
    use little_lemon_restaurant::models::{NewCategory, NewMenuItem};

    use super::super::tests::pool;
    use super::*;

    async fn fixtures(pool: &SqlitePool) -> (UserId, MenuItemId) {
        let user = UserRepository::new(pool)
            .create(&Username::parse("mario").unwrap(), "x", false)
            .await
            .unwrap();
        let category = CategoryRepository::new(pool)
            .create(&NewCategory {
                slug: Slug::parse("mains").unwrap(),
                title: "Mains".to_string(),
            })
            .await
            .unwrap();
        let item = MenuItemRepository::new(pool)
            .create(&NewMenuItem {
                title: "Lemon Dessert".to_string(),
                price: Price::parse("5.00").unwrap(),
                featured: false,
                category_id: category.id,
            })
            .await
            .unwrap();
        (user.id, item.id)
    }

    #[tokio::test]
    async fn test_second_line_for_same_item_is_a_form_error() {
        let pool = pool().await;
        let (user, item) = fixtures(&pool).await;
        let data = FormData::new()
            .with("user", user)
            .with("menuitem", item)
            .with("quantity", 2)
            .with("unit_price", "5.00")
            .with("price", "10.00");

        let saved = save(&pool, None, &data).await.unwrap().unwrap();
        assert_eq!(saved.display, "mario: Lemon Dessert");

        let errors = save(&pool, None, &data).await.unwrap().unwrap_err();
        assert!(errors.has(FieldErrors::FORM));

        let loaded = instance(&pool, saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, data);
    }

    #[tokio::test]
    async fn test_unknown_reference_is_a_form_error() {
        let pool = pool().await;
        let data = FormData::new()
            .with("user", 99)
            .with("menuitem", 98)
            .with("quantity", 1)
            .with("unit_price", "1.00")
            .with("price", "1.00");
        let errors = save(&pool, None, &data).await.unwrap().unwrap_err();
        assert!(errors.message(FieldErrors::FORM).starts_with("A related record"));
    }
}
