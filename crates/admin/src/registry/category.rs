//! Menu categories. Titles are edited in place on the change list.

use sqlx::SqlitePool;

use little_lemon_core::CategoryId;
use little_lemon_restaurant::db::{CategoryRepository, RepositoryError};
use little_lemon_restaurant::forms::FieldErrors;
use little_lemon_restaurant::models::NewCategory;

use super::{Cell, Instance, ListQuery, ListRow, SaveOutcome, Saved, conflict_as_form_error};
use crate::components::{DataTableConfig, FilterOption, TableColumn, TableFilter};
use crate::forms::{FormData, FormField, Validator};

const TITLE_INPUT: &str = "title";

pub(super) fn table() -> DataTableConfig {
    DataTableConfig::new("category")
        .column(TableColumn::new("id", "ID"))
        .column(TableColumn::editable(TITLE_INPUT, "Title"))
        .search_placeholder("Search by title")
        .empty_state("No categories yet")
}

pub(super) async fn filters(pool: &SqlitePool) -> Result<Vec<TableFilter>, RepositoryError> {
    let titles = CategoryRepository::new(pool).titles().await?;
    let options = titles
        .iter()
        .map(|title| FilterOption::new(title, title))
        .collect();
    Ok(vec![TableFilter::select("title", "By title", options)])
}

fn title_input() -> FormField {
    FormField::text(TITLE_INPUT, "Title", NewCategory::TITLE_MAX_LENGTH)
}

pub(super) async fn rows(
    pool: &SqlitePool,
    query: &ListQuery,
) -> Result<Vec<ListRow>, RepositoryError> {
    let categories = CategoryRepository::new(pool)
        .list(query.search(), query.filter("title"))
        .await?;
    Ok(categories
        .into_iter()
        .map(|category| {
            let id = category.id.as_i64();
            let cells = vec![
                Cell::text(id),
                Cell::editable(title_input(), id, &category.title),
            ];
            ListRow::new(id, &category, cells)
        })
        .collect())
}

pub(super) fn fields() -> Vec<FormField> {
    vec![
        FormField::text("slug", "Slug", little_lemon_core::Slug::MAX_LENGTH)
            .help("Letters, numbers, underscores or hyphens."),
        title_input(),
    ]
}

pub(super) async fn instance(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Instance>, RepositoryError> {
    let category = CategoryRepository::new(pool).get(CategoryId::new(id)).await?;
    Ok(category.map(|category| Instance {
        display: category.to_string(),
        data: FormData::new()
            .with("slug", &category.slug)
            .with("title", &category.title),
    }))
}

fn validate(data: &FormData) -> Result<NewCategory, FieldErrors> {
    let mut v = Validator::new(data);
    let slug = v.slug("slug");
    let title = v.text("title", NewCategory::TITLE_MAX_LENGTH);
    v.finish(slug.zip(title))
        .map(|(slug, title)| NewCategory { slug, title })
}

pub(super) async fn save(pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
    let input = match validate(data) {
        Ok(input) => input,
        Err(errors) => return Ok(Err(errors)),
    };
    let repo = CategoryRepository::new(pool);
    let result = match id {
        None => repo.create(&input).await,
        Some(id) => repo.update(CategoryId::new(id), &input).await,
    };
    Ok(conflict_as_form_error(result)?.map(|category| Saved::new(category.id, &category)))
}

/// Save every `title-<id>` input of the change list.
///
/// All inputs are validated before anything is written.
pub(super) async fn save_list(pool: &SqlitePool, data: &FormData) -> SaveOutcome<usize> {
    let prefix = format!("{TITLE_INPUT}-");
    let mut v = Validator::new(data);
    let mut updates = Vec::new();
    for (id, _) in data.with_prefix(&prefix) {
        let name = format!("{prefix}{id}");
        let Ok(id) = id.parse::<i64>() else {
            v.error(&name, "Invalid row.");
            continue;
        };
        if let Some(title) = v.text(&name, NewCategory::TITLE_MAX_LENGTH) {
            updates.push((CategoryId::new(id), title));
        }
    }
    let updates = match v.finish(Some(updates)) {
        Ok(updates) => updates,
        Err(errors) => return Ok(Err(errors)),
    };

    let repo = CategoryRepository::new(pool);
    for (id, title) in &updates {
        repo.update_title(*id, title).await?;
    }
    Ok(Ok(updates.len()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::pool;
    use super::*;

    async fn add(pool: &SqlitePool, slug: &str, title: &str) -> i64 {
        let data = FormData::new().with("slug", slug).with("title", title);
        save(pool, None, &data).await.unwrap().unwrap().id
    }

    #[tokio::test]
    async fn test_rows_are_ordered_by_id_and_filtered_by_title() {
        let pool = pool().await;
        let starters = add(&pool, "starters", "Starters").await;
        let mains = add(&pool, "mains", "Mains").await;

        let all = rows(&pool, &ListQuery::default()).await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), [starters, mains]);

        let mut query = ListQuery::default();
        query.filters.insert("title".to_string(), "Mains".to_string());
        let filtered = rows(&pool, &query).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].display, "Mains");

        let options = &filters(&pool).await.unwrap()[0].options;
        assert_eq!(options.len(), 2);
    }

    #[tokio::test]
    async fn test_save_list_updates_titles() {
        let pool = pool().await;
        let id = add(&pool, "starters", "Starters").await;

        let data = FormData::new().with(&format!("title-{id}"), "Small plates");
        assert_eq!(save_list(&pool, &data).await.unwrap().unwrap(), 1);
        let loaded = instance(&pool, id).await.unwrap().unwrap();
        assert_eq!(loaded.display, "Small plates");

        let blank = FormData::new().with(&format!("title-{id}"), " ");
        let errors = save_list(&pool, &blank).await.unwrap().unwrap_err();
        assert!(errors.has(&format!("title-{id}")));
    }

    #[test]
    fn test_slug_is_validated() {
        let errors = validate(&FormData::new().with("slug", "not a slug").with("title", "X"))
            .unwrap_err();
        assert!(errors.message("slug").starts_with("Enter a valid slug"));
    }
}
