//! Cart line types.

use core::fmt;

use little_lemon_core::{CartId, MenuItemId, Price, UserId, Username};

/// One menu item in a user's cart.
///
/// A user holds at most one line per menu item.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub menuitem_id: MenuItemId,
    pub quantity: u32,
    pub unit_price: Price,
    pub price: Price,
}

/// A cart line joined with the names it references.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CartLine {
    #[sqlx(flatten)]
    pub cart: Cart,
    pub username: Username,
    pub menuitem_title: String,
}

impl fmt::Display for CartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.username, self.menuitem_title)
    }
}

/// Input for creating or updating a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCart {
    pub user_id: UserId,
    pub menuitem_id: MenuItemId,
    pub quantity: u32,
    pub unit_price: Price,
    pub price: Price,
}
