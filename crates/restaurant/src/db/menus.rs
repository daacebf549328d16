//! Menu repository for database operations.

use sqlx::SqlitePool;

use little_lemon_core::MenuId;

use super::RepositoryError;
use crate::models::{Menu, NewMenu};

/// Repository for printed-menu entries.
pub struct MenuRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MenuRepository<'a> {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All menu entries ordered by name, for the public menu page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_name(&self) -> Result<Vec<Menu>, RepositoryError> {
        let menus = sqlx::query_as::<_, Menu>(
            "SELECT id, name, price, menu_item_description FROM menus ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(menus)
    }

    /// Menu entries newest first; `search` matches name or price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Menu>, RepositoryError> {
        let menus = sqlx::query_as::<_, Menu>(
            r"
            SELECT id, name, price, menu_item_description
            FROM menus
            WHERE ?1 IS NULL
               OR instr(lower(name), lower(?1)) > 0
               OR instr(price, ?1) > 0
            ORDER BY id DESC
            ",
        )
        .bind(search)
        .fetch_all(self.pool)
        .await?;
        Ok(menus)
    }

    /// Get a menu entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: MenuId) -> Result<Option<Menu>, RepositoryError> {
        let menu = sqlx::query_as::<_, Menu>(
            "SELECT id, name, price, menu_item_description FROM menus WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(menu)
    }

    /// Get the first menu entry with the given name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Menu>, RepositoryError> {
        let menu = sqlx::query_as::<_, Menu>(
            "SELECT id, name, price, menu_item_description FROM menus WHERE name = ? ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(menu)
    }

    /// Create a menu entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewMenu) -> Result<Menu, RepositoryError> {
        let menu = sqlx::query_as::<_, Menu>(
            r"
            INSERT INTO menus (name, price, menu_item_description)
            VALUES (?, ?, ?)
            RETURNING id, name, price, menu_item_description
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.menu_item_description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "menu entry already exists"))?;
        Ok(menu)
    }

    /// Update a menu entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry doesn't exist.
    pub async fn update(&self, id: MenuId, input: &NewMenu) -> Result<Menu, RepositoryError> {
        sqlx::query_as::<_, Menu>(
            r"
            UPDATE menus SET name = ?, price = ?, menu_item_description = ?
            WHERE id = ?
            RETURNING id, name, price, menu_item_description
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.menu_item_description)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a menu entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry doesn't exist.
    pub async fn delete(&self, id: MenuId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM menus WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all menu entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM menus")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use little_lemon_core::Price;

    use super::*;
    use crate::db::test_support;

    fn burger() -> NewMenu {
        NewMenu {
            name: "Burger".to_string(),
            price: Price::parse("9.99").unwrap(),
            menu_item_description: "A delicious burger with all the fixings.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_menu_roundtrip_keeps_exact_price() {
        let pool = test_support::pool().await;
        let repo = MenuRepository::new(&pool);

        repo.create(&burger()).await.unwrap();
        let menu = repo.get_by_name("Burger").await.unwrap().unwrap();
        assert_eq!(menu.price, Price::parse("9.99").unwrap());
        assert_eq!(
            menu.menu_item_description,
            "A delicious burger with all the fixings."
        );
        assert_eq!(menu.to_string(), "Burger");
    }

    #[tokio::test]
    async fn test_search_by_name_or_price() {
        let pool = test_support::pool().await;
        let repo = MenuRepository::new(&pool);

        repo.create(&burger()).await.unwrap();
        repo.create(&NewMenu {
            name: "Greek Salad".to_string(),
            price: Price::parse("12.50").unwrap(),
            menu_item_description: String::new(),
        })
        .await
        .unwrap();

        assert_eq!(repo.list(Some("greek")).await.unwrap().len(), 1);
        assert_eq!(repo.list(Some("9.99")).await.unwrap().len(), 1);
        let by_name = repo.list_by_name().await.unwrap();
        assert_eq!(by_name[0].name, "Burger");
    }
}
