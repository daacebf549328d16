//! Category repository for database operations.

use sqlx::SqlitePool;

use little_lemon_core::{CategoryId, Slug};

use super::RepositoryError;
use crate::models::{Category, NewCategory};

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    slug: String,
    title: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;

        Ok(Self {
            id: CategoryId::new(row.id),
            slug,
            title: row.title,
        })
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List categories ordered by ID.
    ///
    /// `search` matches anywhere in the title (case-insensitive); `title`
    /// keeps only categories with exactly that title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored slug is invalid.
    pub async fn list(
        &self,
        search: Option<&str>,
        title: Option<&str>,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, slug, title
            FROM categories
            WHERE (?1 IS NULL OR instr(lower(title), lower(?1)) > 0)
              AND (?2 IS NULL OR title = ?2)
            ORDER BY id
            ",
        )
        .bind(search)
        .bind(title)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Distinct category titles, alphabetically, for the title filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn titles(&self) -> Result<Vec<String>, RepositoryError> {
        let titles = sqlx::query_scalar("SELECT DISTINCT title FROM categories ORDER BY title")
            .fetch_all(self.pool)
            .await?;
        Ok(titles)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored slug is invalid.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, slug, title FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get the first category with the given slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored slug is invalid.
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, slug, title FROM categories WHERE slug = ? ORDER BY id LIMIT 1",
        )
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewCategory) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories (slug, title) VALUES (?, ?) RETURNING id, slug, title",
        )
        .bind(input.slug.as_str())
        .bind(&input.title)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "category already exists"))?;

        row.try_into()
    }

    /// Update a category's slug and title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &NewCategory,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "UPDATE categories SET slug = ?, title = ? WHERE id = ? RETURNING id, slug, title",
        )
        .bind(input.slug.as_str())
        .bind(&input.title)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Change only the title (inline edit from the change list).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn update_title(&self, id: CategoryId, title: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE categories SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` while menu items still belong to it.
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| match RepositoryError::from_write(e, "category is in use") {
                RepositoryError::Conflict(_) => RepositoryError::Conflict(
                    "menu items still belong to this category".to_owned(),
                ),
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn food() -> NewCategory {
        NewCategory {
            slug: Slug::parse("food").unwrap(),
            title: "Food Category".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_category() {
        let pool = test_support::pool().await;
        let repo = CategoryRepository::new(&pool);

        let created = repo.create(&food()).await.unwrap();
        let fetched = repo.get_by_slug(&Slug::parse("food").unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Food Category");
        assert_eq!(fetched.to_string(), "Food Category");
    }

    #[tokio::test]
    async fn test_list_filters_and_titles() {
        let pool = test_support::pool().await;
        let repo = CategoryRepository::new(&pool);

        repo.create(&food()).await.unwrap();
        repo.create(&NewCategory {
            slug: Slug::parse("drinks").unwrap(),
            title: "Drinks".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(repo.list(None, None).await.unwrap().len(), 2);
        assert_eq!(repo.list(Some("food"), None).await.unwrap().len(), 1);
        assert_eq!(repo.list(None, Some("Drinks")).await.unwrap().len(), 1);
        assert_eq!(repo.titles().await.unwrap(), ["Drinks", "Food Category"]);
    }

    #[tokio::test]
    async fn test_update_title() {
        let pool = test_support::pool().await;
        let repo = CategoryRepository::new(&pool);

        let created = repo.create(&food()).await.unwrap();
        repo.update_title(created.id, "Mains").await.unwrap();
        assert_eq!(repo.get(created.id).await.unwrap().unwrap().title, "Mains");
        assert!(matches!(
            repo.update_title(CategoryId::new(99), "x").await,
            Err(RepositoryError::NotFound)
        ));
    }
}
