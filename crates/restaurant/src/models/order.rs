//! Order and order line types.

use core::fmt;

use chrono::NaiveDate;

use little_lemon_core::{MenuItemId, OrderId, OrderItemId, OrderStatus, Price, UserId, Username};

use super::User;

/// A customer order, optionally assigned to a delivery crew member.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Cleared when the crew member's account is deleted.
    pub delivery_crew_id: Option<UserId>,
    pub status: OrderStatus,
    pub total: Price,
    pub date: NaiveDate,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{}", self.id)
    }
}

/// An order joined with the usernames it references.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderLine {
    #[sqlx(flatten)]
    pub order: Order,
    pub username: Username,
    pub delivery_crew_username: Option<Username>,
}

/// An order with both user references resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    pub order: Order,
    pub user: User,
    pub delivery_crew: Option<User>,
}

/// Input for creating or updating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub delivery_crew_id: Option<UserId>,
    pub status: OrderStatus,
    pub total: Price,
    pub date: NaiveDate,
}

/// One menu item within an order.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub menuitem_id: MenuItemId,
    pub quantity: u32,
    pub price: Price,
}

/// An order line joined with its menu item's title.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderItemLine {
    #[sqlx(flatten)]
    pub item: OrderItem,
    pub menuitem_title: String,
}

impl fmt::Display for OrderItemLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{}: {}", self.item.order_id, self.menuitem_title)
    }
}

/// Input for creating or updating an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub menuitem_id: MenuItemId,
    pub quantity: u32,
    pub price: Price,
}
