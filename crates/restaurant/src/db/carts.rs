//! Cart repository for database operations.

use sqlx::SqlitePool;

use little_lemon_core::CartId;

use super::RepositoryError;
use crate::models::{Cart, CartLine, NewCart};

const DUPLICATE_LINE: &str = "this user already has that menu item in their cart";

/// Repository for cart line database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All cart lines newest first, joined with usernames and item titles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT c.id, c.user_id, c.menuitem_id, c.quantity, c.unit_price, c.price,
                   u.username, m.title AS menuitem_title
            FROM carts c
            JOIN users u ON u.id = c.user_id
            JOIN menu_items m ON m.id = c.menuitem_id
            ORDER BY c.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(lines)
    }

    /// Get a cart line by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, menuitem_id, quantity, unit_price, price FROM carts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(cart)
    }

    /// Get a cart line with its display names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_line(&self, id: CartId) -> Result<Option<CartLine>, RepositoryError> {
        let line = sqlx::query_as::<_, CartLine>(
            r"
            SELECT c.id, c.user_id, c.menuitem_id, c.quantity, c.unit_price, c.price,
                   u.username, m.title AS menuitem_title
            FROM carts c
            JOIN users u ON u.id = c.user_id
            JOIN menu_items m ON m.id = c.menuitem_id
            WHERE c.id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(line)
    }

    /// Add a line to a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a line for
    /// that menu item, or either reference doesn't exist.
    pub async fn create(&self, input: &NewCart) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            INSERT INTO carts (user_id, menuitem_id, quantity, unit_price, price)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_id, menuitem_id, quantity, unit_price, price
            ",
        )
        .bind(input.user_id)
        .bind(input.menuitem_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, DUPLICATE_LINE))?;
        Ok(cart)
    }

    /// Update a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Conflict` on a duplicate (user, menu item).
    pub async fn update(&self, id: CartId, input: &NewCart) -> Result<Cart, RepositoryError> {
        sqlx::query_as::<_, Cart>(
            r"
            UPDATE carts
            SET user_id = ?, menuitem_id = ?, quantity = ?, unit_price = ?, price = ?
            WHERE id = ?
            RETURNING id, user_id, menuitem_id, quantity, unit_price, price
            ",
        )
        .bind(input.user_id)
        .bind(input.menuitem_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.price)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, DUPLICATE_LINE))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    pub async fn delete(&self, id: CartId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM carts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use little_lemon_core::{MenuItemId, Price, Slug, UserId, Username};

    use super::*;
    use crate::db::{CategoryRepository, MenuItemRepository, UserRepository, test_support};
    use crate::models::{NewCategory, NewMenuItem};

    async fn seed(pool: &SqlitePool) -> (UserId, UserId, MenuItemId) {
        let users = UserRepository::new(pool);
        let first = users
            .create(&Username::parse("testuser").unwrap(), "h", false)
            .await
            .unwrap();
        let second = users
            .create(&Username::parse("testuser2").unwrap(), "h", false)
            .await
            .unwrap();
        let category = CategoryRepository::new(pool)
            .create(&NewCategory {
                slug: Slug::parse("food").unwrap(),
                title: "Food Category".to_string(),
            })
            .await
            .unwrap();
        let item = MenuItemRepository::new(pool)
            .create(&NewMenuItem {
                title: "Cheeseburger".to_string(),
                price: Price::parse("8.99").unwrap(),
                featured: true,
                category_id: category.id,
            })
            .await
            .unwrap();
        (first.id, second.id, item.id)
    }

    fn line(user_id: UserId, menuitem_id: MenuItemId, quantity: u32) -> NewCart {
        let unit_price = Price::parse("8.99").unwrap();
        NewCart {
            user_id,
            menuitem_id,
            quantity,
            unit_price,
            price: unit_price.times(quantity).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_cart_line_joins_names() {
        let pool = test_support::pool().await;
        let (user_id, _, item_id) = seed(&pool).await;
        let repo = CartRepository::new(&pool);

        let cart = repo.create(&line(user_id, item_id, 2)).await.unwrap();
        let joined = repo.get_line(cart.id).await.unwrap().unwrap();

        assert_eq!(joined.username.as_str(), "testuser");
        assert_eq!(joined.menuitem_title, "Cheeseburger");
        assert_eq!(joined.cart.unit_price, Price::parse("8.99").unwrap());
        assert_eq!(joined.cart.price, Price::parse("17.98").unwrap());
        assert_eq!(joined.to_string(), "testuser: Cheeseburger");
    }

    #[tokio::test]
    async fn test_same_user_and_item_is_rejected() {
        let pool = test_support::pool().await;
        let (user_id, other_id, item_id) = seed(&pool).await;
        let repo = CartRepository::new(&pool);

        repo.create(&line(user_id, item_id, 2)).await.unwrap();
        let err = repo.create(&line(user_id, item_id, 1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // Another user may hold the same item.
        repo.create(&line(other_id, item_id, 1)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_deleting_user_removes_their_cart() {
        let pool = test_support::pool().await;
        let (user_id, _, item_id) = seed(&pool).await;
        let repo = CartRepository::new(&pool);

        repo.create(&line(user_id, item_id, 2)).await.unwrap();
        UserRepository::new(&pool).delete(user_id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
