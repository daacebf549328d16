//! Order repository for database operations.

use sqlx::SqlitePool;

use little_lemon_core::{OrderId, OrderStatus};

use super::{RepositoryError, UserRepository};
use crate::models::{NewOrder, Order, OrderDetail, OrderLine};

const ORDER_COLUMNS: &str = "id, user_id, delivery_crew_id, status, total, date";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All orders newest first, joined with customer and crew usernames.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<OrderLine>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderLine>(
            r"
            SELECT o.id, o.user_id, o.delivery_crew_id, o.status, o.total, o.date,
                   u.username, d.username AS delivery_crew_username
            FROM orders o
            JOIN users u ON u.id = o.user_id
            LEFT JOIN users d ON d.id = o.delivery_crew_id
            ORDER BY o.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(order)
    }

    /// Get an order with its customer and delivery crew resolved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the customer row is missing.
    pub async fn get_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, RepositoryError> {
        let Some(order) = self.get(id).await? else {
            return Ok(None);
        };

        let users = UserRepository::new(self.pool);
        let user = users.get_by_id(order.user_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "order {} references missing user {}",
                order.id, order.user_id
            ))
        })?;
        let delivery_crew = match order.delivery_crew_id {
            Some(crew_id) => users.get_by_id(crew_id).await?,
            None => None,
        };

        Ok(Some(OrderDetail {
            order,
            user,
            delivery_crew,
        }))
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a referenced user doesn't exist.
    pub async fn create(&self, input: &NewOrder) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (user_id, delivery_crew_id, status, total, date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(input.user_id)
        .bind(input.delivery_crew_id)
        .bind(input.status)
        .bind(input.total)
        .bind(input.date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order already exists"))?;
        Ok(order)
    }

    /// Update an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Conflict` if a referenced user doesn't exist.
    pub async fn update(&self, id: OrderId, input: &NewOrder) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(&format!(
            r"
            UPDATE orders
            SET user_id = ?, delivery_crew_id = ?, status = ?, total = ?, date = ?
            WHERE id = ?
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(input.user_id)
        .bind(input.delivery_crew_id)
        .bind(input.status)
        .bind(input.total)
        .bind(input.date)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Change only the delivery status (inline edit from the change list).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete an order and its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use little_lemon_core::{Price, UserId, Username};

    use super::*;
    use crate::db::test_support;

    async fn seed_users(pool: &SqlitePool) -> (UserId, UserId) {
        let users = UserRepository::new(pool);
        let user = users
            .create(&Username::parse("testuser").unwrap(), "h", false)
            .await
            .unwrap();
        let crew = users
            .create(&Username::parse("deliveryuser").unwrap(), "h", false)
            .await
            .unwrap();
        (user.id, crew.id)
    }

    fn order(user_id: UserId, crew_id: Option<UserId>) -> NewOrder {
        NewOrder {
            user_id,
            delivery_crew_id: crew_id,
            status: OrderStatus::Delivered,
            total: Price::parse("25.99").unwrap(),
            date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_order_detail_resolves_users() {
        let pool = test_support::pool().await;
        let (user_id, crew_id) = seed_users(&pool).await;
        let repo = OrderRepository::new(&pool);

        let created = repo.create(&order(user_id, Some(crew_id))).await.unwrap();
        let detail = repo.get_detail(created.id).await.unwrap().unwrap();

        assert_eq!(detail.user.username.as_str(), "testuser");
        assert_eq!(
            detail.delivery_crew.unwrap().username.as_str(),
            "deliveryuser"
        );
        assert!(detail.order.status.is_delivered());
        assert_eq!(detail.order.to_string(), format!("Order #{}", created.id));
    }

    #[tokio::test]
    async fn test_deleting_crew_keeps_order() {
        let pool = test_support::pool().await;
        let (user_id, crew_id) = seed_users(&pool).await;
        let repo = OrderRepository::new(&pool);

        let created = repo.create(&order(user_id, Some(crew_id))).await.unwrap();
        UserRepository::new(&pool).delete(crew_id).await.unwrap();

        let order = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(order.delivery_crew_id, None);
        assert_eq!(order.total, Price::parse("25.99").unwrap());
    }

    #[tokio::test]
    async fn test_deleting_customer_deletes_order() {
        let pool = test_support::pool().await;
        let (user_id, crew_id) = seed_users(&pool).await;
        let repo = OrderRepository::new(&pool);

        repo.create(&order(user_id, Some(crew_id))).await.unwrap();
        UserRepository::new(&pool).delete(user_id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_status() {
        let pool = test_support::pool().await;
        let (user_id, _) = seed_users(&pool).await;
        let repo = OrderRepository::new(&pool);

        let created = repo.create(&order(user_id, None)).await.unwrap();
        repo.set_status(created.id, OrderStatus::Pending).await.unwrap();

        let lines = repo.list().await.unwrap();
        assert_eq!(lines[0].order.status, OrderStatus::Pending);
        assert_eq!(lines[0].delivery_crew_username, None);
    }
}
