//! Order item repository for database operations.

use sqlx::SqlitePool;

use little_lemon_core::OrderItemId;

use super::RepositoryError;
use crate::models::{NewOrderItem, OrderItem, OrderItemLine};

const DUPLICATE_LINE: &str = "this order already contains that menu item";

/// Repository for order line database operations.
pub struct OrderItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderItemRepository<'a> {
    /// Create a new order item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All order lines newest first, with menu item titles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<OrderItemLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, OrderItemLine>(
            r"
            SELECT oi.id, oi.order_id, oi.menuitem_id, oi.quantity, oi.price,
                   m.title AS menuitem_title
            FROM order_items oi
            JOIN menu_items m ON m.id = oi.menuitem_id
            ORDER BY oi.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(lines)
    }

    /// Get an order line by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderItemId) -> Result<Option<OrderItem>, RepositoryError> {
        let item = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, menuitem_id, quantity, price FROM order_items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(item)
    }

    /// Get an order line with its menu item title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_line(&self, id: OrderItemId) -> Result<Option<OrderItemLine>, RepositoryError> {
        let line = sqlx::query_as::<_, OrderItemLine>(
            r"
            SELECT oi.id, oi.order_id, oi.menuitem_id, oi.quantity, oi.price,
                   m.title AS menuitem_title
            FROM order_items oi
            JOIN menu_items m ON m.id = oi.menuitem_id
            WHERE oi.id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(line)
    }

    /// Add a line to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order already has a line
    /// for that menu item, or either reference doesn't exist.
    pub async fn create(&self, input: &NewOrderItem) -> Result<OrderItem, RepositoryError> {
        let item = sqlx::query_as::<_, OrderItem>(
            r"
            INSERT INTO order_items (order_id, menuitem_id, quantity, price)
            VALUES (?, ?, ?, ?)
            RETURNING id, order_id, menuitem_id, quantity, price
            ",
        )
        .bind(input.order_id)
        .bind(input.menuitem_id)
        .bind(input.quantity)
        .bind(input.price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, DUPLICATE_LINE))?;
        Ok(item)
    }

    /// Update an order line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Conflict` on a duplicate (order, menu item).
    pub async fn update(
        &self,
        id: OrderItemId,
        input: &NewOrderItem,
    ) -> Result<OrderItem, RepositoryError> {
        sqlx::query_as::<_, OrderItem>(
            r"
            UPDATE order_items SET order_id = ?, menuitem_id = ?, quantity = ?, price = ?
            WHERE id = ?
            RETURNING id, order_id, menuitem_id, quantity, price
            ",
        )
        .bind(input.order_id)
        .bind(input.menuitem_id)
        .bind(input.quantity)
        .bind(input.price)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, DUPLICATE_LINE))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete an order line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    pub async fn delete(&self, id: OrderItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM order_items WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all order lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use little_lemon_core::{OrderStatus, Price, Slug, Username};

    use super::*;
    use crate::db::{
        CategoryRepository, MenuItemRepository, OrderRepository, UserRepository, test_support,
    };
    use crate::models::{NewCategory, NewMenuItem, NewOrder};

    #[tokio::test]
    async fn test_order_item_references_order_and_item() {
        let pool = test_support::pool().await;
        let user = UserRepository::new(&pool)
            .create(&Username::parse("testuser").unwrap(), "h", false)
            .await
            .unwrap();
        let orders = OrderRepository::new(&pool);
        let order = orders
            .create(&NewOrder {
                user_id: user.id,
                delivery_crew_id: None,
                status: OrderStatus::Delivered,
                total: Price::parse("25.99").unwrap(),
                date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            })
            .await
            .unwrap();
        let category = CategoryRepository::new(&pool)
            .create(&NewCategory {
                slug: Slug::parse("food").unwrap(),
                title: "Food Category".to_string(),
            })
            .await
            .unwrap();
        let item = MenuItemRepository::new(&pool)
            .create(&NewMenuItem {
                title: "Cheeseburger".to_string(),
                price: Price::parse("8.99").unwrap(),
                featured: true,
                category_id: category.id,
            })
            .await
            .unwrap();

        let repo = OrderItemRepository::new(&pool);
        let input = NewOrderItem {
            order_id: order.id,
            menuitem_id: item.id,
            quantity: 2,
            price: Price::parse("17.98").unwrap(),
        };
        let created = repo.create(&input).await.unwrap();

        let line = repo.get_line(created.id).await.unwrap().unwrap();
        assert_eq!(line.menuitem_title, "Cheeseburger");
        assert_eq!(line.item.price, Price::parse("17.98").unwrap());
        assert_eq!(line.to_string(), format!("Order #{}: Cheeseburger", order.id));

        let parent = orders.get(line.item.order_id).await.unwrap().unwrap();
        assert_eq!(parent.total, Price::parse("25.99").unwrap());

        assert!(matches!(
            repo.create(&input).await,
            Err(RepositoryError::Conflict(_))
        ));

        orders.delete(order.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
