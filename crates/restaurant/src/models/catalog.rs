//! Menu catalog types: categories, menu entries and menu items.

use core::fmt;

use little_lemon_core::{CategoryId, MenuId, MenuItemId, Price, Slug};

/// A grouping of menu items, e.g. "Main Courses".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub slug: Slug,
    pub title: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub slug: Slug,
    pub title: String,
}

impl NewCategory {
    /// Maximum length of `title`.
    pub const TITLE_MAX_LENGTH: usize = 255;
}

/// An entry on the printed menu shown on the public site.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Menu {
    pub id: MenuId,
    pub name: String,
    pub price: Price,
    pub menu_item_description: String,
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Input for creating or updating a menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenu {
    pub name: String,
    pub price: Price,
    pub menu_item_description: String,
}

impl NewMenu {
    /// Maximum length of `name`.
    pub const NAME_MAX_LENGTH: usize = 200;
    /// Maximum length of `menu_item_description`.
    pub const DESCRIPTION_MAX_LENGTH: usize = 1000;
}

/// A sellable item that belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub title: String,
    pub price: Price,
    pub featured: bool,
    pub category_id: CategoryId,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A menu item together with its category's title, for listings.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MenuItemLine {
    #[sqlx(flatten)]
    pub item: MenuItem,
    pub category_title: String,
}

/// A menu item with its category resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemDetail {
    pub item: MenuItem,
    pub category: Category,
}

/// Input for creating or updating a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenuItem {
    pub title: String,
    pub price: Price,
    pub featured: bool,
    pub category_id: CategoryId,
}

impl NewMenuItem {
    /// Maximum length of `title`.
    pub const TITLE_MAX_LENGTH: usize = 255;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_human_label() {
        let category = Category {
            id: CategoryId::new(1),
            slug: Slug::parse("food").unwrap(),
            title: "Food Category".to_string(),
        };
        assert_eq!(category.to_string(), "Food Category");

        let menu = Menu {
            id: MenuId::new(1),
            name: "Burger".to_string(),
            price: Price::parse("9.99").unwrap(),
            menu_item_description: "A delicious burger with all the fixings.".to_string(),
        };
        assert_eq!(menu.to_string(), "Burger");

        let item = MenuItem {
            id: MenuItemId::new(1),
            title: "Cheeseburger".to_string(),
            price: Price::parse("8.99").unwrap(),
            featured: true,
            category_id: category.id,
        };
        assert_eq!(item.to_string(), "Cheeseburger");
    }
}
