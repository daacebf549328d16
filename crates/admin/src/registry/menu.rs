//! Menu entries: name, price and description.

use sqlx::SqlitePool;

use little_lemon_core::MenuId;
use little_lemon_restaurant::db::{MenuRepository, RepositoryError};
use little_lemon_restaurant::models::NewMenu;

use super::{Cell, Instance, ListQuery, ListRow, SaveOutcome, Saved, conflict_as_form_error};
use crate::components::{DataTableConfig, TableColumn};
use crate::forms::{FormData, FormField, Validator};

pub(super) fn table() -> DataTableConfig {
    DataTableConfig::new("menu")
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("price", "Price"))
        .column(TableColumn::new("menu_item_description", "Menu item description"))
        .search_placeholder("Search by name or price")
        .empty_state("No menus yet")
}

pub(super) async fn rows(
    pool: &SqlitePool,
    query: &ListQuery,
) -> Result<Vec<ListRow>, RepositoryError> {
    let menus = MenuRepository::new(pool).list(query.search()).await?;
    Ok(menus
        .into_iter()
        .map(|menu| {
            let cells = vec![
                Cell::text(&menu.name),
                Cell::text(menu.price),
                Cell::text(&menu.menu_item_description),
            ];
            ListRow::new(menu.id, &menu, cells)
        })
        .collect())
}

pub(super) fn fields() -> Vec<FormField> {
    vec![
        FormField::text("name", "Name", NewMenu::NAME_MAX_LENGTH),
        FormField::decimal("price", "Price"),
        FormField::textarea(
            "menu_item_description",
            "Menu item description",
            NewMenu::DESCRIPTION_MAX_LENGTH,
        )
        .optional(),
    ]
}

pub(super) async fn instance(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Instance>, RepositoryError> {
    let menu = MenuRepository::new(pool).get(MenuId::new(id)).await?;
    Ok(menu.map(|menu| Instance {
        display: menu.to_string(),
        data: FormData::new()
            .with("name", &menu.name)
            .with("price", menu.price)
            .with("menu_item_description", &menu.menu_item_description),
    }))
}

fn validate(data: &FormData) -> Result<NewMenu, little_lemon_restaurant::forms::FieldErrors> {
    let mut v = Validator::new(data);
    let name = v.text("name", NewMenu::NAME_MAX_LENGTH);
    let price = v.price("price");
    let description = match data.get("menu_item_description") {
        None => Some(String::new()),
        Some(_) => v.text("menu_item_description", NewMenu::DESCRIPTION_MAX_LENGTH),
    };
    let value = name.zip(price).zip(description);
    v.finish(value).map(|((name, price), menu_item_description)| NewMenu {
        name,
        price,
        menu_item_description,
    })
}

pub(super) async fn save(pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
    let input = match validate(data) {
        Ok(input) => input,
        Err(errors) => return Ok(Err(errors)),
    };
    let repo = MenuRepository::new(pool);
    let result = match id {
        None => repo.create(&input).await,
        Some(id) => repo.update(MenuId::new(id), &input).await,
    };
    Ok(conflict_as_form_error(result)?.map(|menu| Saved::new(menu.id, &menu)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::pool;
    use super::*;

    #[tokio::test]
    async fn test_search_matches_name_or_price() {
        let pool = pool().await;
        for (name, price) in [("Greek Salad", "12.50"), ("Bruschetta", "7.99")] {
            let data = FormData::new().with("name", name).with("price", price);
            save(&pool, None, &data).await.unwrap().unwrap();
        }

        let query = ListQuery {
            search: Some("salad".to_string()),
            ..ListQuery::default()
        };
        let found = rows(&pool, &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display, "Greek Salad");

        let query = ListQuery {
            search: Some("7.99".to_string()),
            ..ListQuery::default()
        };
        let found = rows(&pool, &query).await.unwrap();
        assert_eq!(found[0].display, "Bruschetta");
    }

    #[test]
    fn test_description_is_optional() {
        let menu = validate(&FormData::new().with("name", "Soup").with("price", "4")).unwrap();
        assert_eq!(menu.menu_item_description, "");
        assert!(validate(&FormData::new().with("name", "Soup")).is_err());
    }
}
