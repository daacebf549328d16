//! Menu items and their categories.

use sqlx::SqlitePool;

use little_lemon_core::{CategoryId, MenuItemId};
use little_lemon_restaurant::db::{MenuItemRepository, RepositoryError};
use little_lemon_restaurant::forms::FieldErrors;
use little_lemon_restaurant::models::NewMenuItem;

use super::{
    Cell, Instance, ListQuery, ListRow, SaveOutcome, Saved, category_options,
    conflict_as_form_error,
};
use crate::components::{DataTableConfig, TableColumn};
use crate::forms::{FormData, FormField, Validator};

pub(super) fn table() -> DataTableConfig {
    DataTableConfig::new("menuitem")
        .column(TableColumn::new("title", "Title"))
        .column(TableColumn::new("price", "Price"))
        .column(TableColumn::new("featured", "Featured"))
        .column(TableColumn::new("category", "Category"))
        .search_placeholder("Search by category")
        .empty_state("No menu items yet")
}

pub(super) async fn rows(
    pool: &SqlitePool,
    query: &ListQuery,
) -> Result<Vec<ListRow>, RepositoryError> {
    let lines = MenuItemRepository::new(pool).list(query.search()).await?;
    Ok(lines
        .into_iter()
        .map(|line| {
            let cells = vec![
                Cell::text(&line.item.title),
                Cell::text(line.item.price),
                Cell::boolean(line.item.featured),
                Cell::text(&line.category_title),
            ];
            ListRow::new(line.item.id, &line.item, cells)
        })
        .collect())
}

pub(super) async fn fields(pool: &SqlitePool) -> Result<Vec<FormField>, RepositoryError> {
    Ok(vec![
        FormField::text("title", "Title", NewMenuItem::TITLE_MAX_LENGTH),
        FormField::decimal("price", "Price"),
        FormField::checkbox("featured", "Featured"),
        FormField::select("category", "Category", category_options(pool).await?),
    ])
}

pub(super) async fn instance(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Instance>, RepositoryError> {
    let item = MenuItemRepository::new(pool).get(MenuItemId::new(id)).await?;
    Ok(item.map(|item| {
        let mut data = FormData::new()
            .with("title", &item.title)
            .with("price", item.price)
            .with("category", item.category_id);
        data.insert_checkbox("featured", item.featured);
        Instance {
            display: item.to_string(),
            data,
        }
    }))
}

fn validate(data: &FormData) -> Result<NewMenuItem, FieldErrors> {
    let mut v = Validator::new(data);
    let title = v.text("title", NewMenuItem::TITLE_MAX_LENGTH);
    let price = v.price("price");
    let featured = v.checkbox("featured");
    let category_id = v.id("category");
    let value = title.zip(price).zip(category_id);
    v.finish(value)
        .map(|((title, price), category_id)| NewMenuItem {
            title,
            price,
            featured,
            category_id: CategoryId::new(category_id),
        })
}

pub(super) async fn save(pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
    let input = match validate(data) {
        Ok(input) => input,
        Err(errors) => return Ok(Err(errors)),
    };
    let repo = MenuItemRepository::new(pool);
    let result = match id {
        None => repo.create(&input).await,
        Some(id) => repo.update(MenuItemId::new(id), &input).await,
    };
    Ok(conflict_as_form_error(result)?.map(|item| Saved::new(item.id, &item)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use little_lemon_core::Slug;
    use little_lemon_restaurant::db::CategoryRepository;
    use little_lemon_restaurant::models::NewCategory;

    use super::super::tests::pool;
    use super::*;

    #[tokio::test]
    async fn test_search_matches_category_title() {
        let pool = pool().await;
        let categories = CategoryRepository::new(&pool);
        for (slug, title, item) in [("mains", "Mains", "Pasta"), ("desserts", "Desserts", "Cake")] {
            let category = categories
                .create(&NewCategory {
                    slug: Slug::parse(slug).unwrap(),
                    title: title.to_string(),
                })
                .await
                .unwrap();
            let data = FormData::new()
                .with("title", item)
                .with("price", "9.00")
                .with("featured", "on")
                .with("category", category.id);
            save(&pool, None, &data).await.unwrap().unwrap();
        }

        let query = ListQuery {
            search: Some("dess".to_string()),
            ..ListQuery::default()
        };
        let found = rows(&pool, &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display, "Cake");
        assert_eq!(found[0].cells[2].text, "Yes");
        assert_eq!(found[0].cells[3].text, "Desserts");
    }

    #[test]
    fn test_unticked_checkbox_means_not_featured() {
        let data = FormData::new()
            .with("title", "Soup")
            .with("price", "3.50")
            .with("category", 1);
        assert!(!validate(&data).unwrap().featured);
    }
}
