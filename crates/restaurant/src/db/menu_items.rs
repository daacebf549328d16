//! Menu item repository for database operations.

use sqlx::SqlitePool;

use little_lemon_core::MenuItemId;

use super::{CategoryRepository, RepositoryError};
use crate::models::{MenuItem, MenuItemDetail, MenuItemLine, NewMenuItem};

const LINE_SELECT: &str = r"
    SELECT m.id, m.title, m.price, m.featured, m.category_id,
           c.title AS category_title
    FROM menu_items m
    JOIN categories c ON c.id = m.category_id
";

/// Repository for menu item database operations.
pub struct MenuItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MenuItemRepository<'a> {
    /// Create a new menu item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Menu items newest first, with their category titles.
    ///
    /// `search` matches the category title (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<MenuItemLine>, RepositoryError> {
        let sql = format!(
            "{LINE_SELECT} WHERE ?1 IS NULL OR instr(lower(c.title), lower(?1)) > 0 ORDER BY m.id DESC"
        );
        let items = sqlx::query_as::<_, MenuItemLine>(&sql)
            .bind(search)
            .fetch_all(self.pool)
            .await?;
        Ok(items)
    }

    /// Featured menu items ordered by title, for the home page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_featured(&self) -> Result<Vec<MenuItemLine>, RepositoryError> {
        let sql = format!("{LINE_SELECT} WHERE m.featured = 1 ORDER BY m.title, m.id");
        let items = sqlx::query_as::<_, MenuItemLine>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(items)
    }

    /// Get a menu item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let item = sqlx::query_as::<_, MenuItem>(
            "SELECT id, title, price, featured, category_id FROM menu_items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(item)
    }

    /// Get the first menu item with the given title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_title(&self, title: &str) -> Result<Option<MenuItem>, RepositoryError> {
        let item = sqlx::query_as::<_, MenuItem>(
            "SELECT id, title, price, featured, category_id FROM menu_items WHERE title = ? ORDER BY id LIMIT 1",
        )
        .bind(title)
        .fetch_optional(self.pool)
        .await?;
        Ok(item)
    }

    /// Get a menu item together with its category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the item's category is missing.
    pub async fn get_detail(
        &self,
        id: MenuItemId,
    ) -> Result<Option<MenuItemDetail>, RepositoryError> {
        let Some(item) = self.get(id).await? else {
            return Ok(None);
        };

        let category = CategoryRepository::new(self.pool)
            .get(item.category_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "menu item {} references missing category {}",
                    item.id, item.category_id
                ))
            })?;

        Ok(Some(MenuItemDetail { item, category }))
    }

    /// Create a menu item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category doesn't exist.
    pub async fn create(&self, input: &NewMenuItem) -> Result<MenuItem, RepositoryError> {
        let item = sqlx::query_as::<_, MenuItem>(
            r"
            INSERT INTO menu_items (title, price, featured, category_id)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, price, featured, category_id
            ",
        )
        .bind(&input.title)
        .bind(input.price)
        .bind(input.featured)
        .bind(input.category_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "menu item already exists"))?;
        Ok(item)
    }

    /// Update a menu item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Conflict` if the category doesn't exist.
    pub async fn update(
        &self,
        id: MenuItemId,
        input: &NewMenuItem,
    ) -> Result<MenuItem, RepositoryError> {
        sqlx::query_as::<_, MenuItem>(
            r"
            UPDATE menu_items SET title = ?, price = ?, featured = ?, category_id = ?
            WHERE id = ?
            RETURNING id, title, price, featured, category_id
            ",
        )
        .bind(&input.title)
        .bind(input.price)
        .bind(input.featured)
        .bind(input.category_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "menu item already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a menu item, along with the cart and order lines that use it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    pub async fn delete(&self, id: MenuItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all menu items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
