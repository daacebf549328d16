//! Per-entity admin registration.
//!
//! Each registered model knows how to list its rows, build its change form,
//! validate a submission and delete a record. Routes dispatch through
//! [`AdminModel`] and never touch a repository directly.

mod booking;
mod cart;
mod category;
mod menu;
mod menu_item;
mod order;
mod order_item;
mod user;

use std::collections::HashMap;
use std::fmt;

use sqlx::SqlitePool;

use little_lemon_restaurant::db::{
    CategoryRepository, MenuItemRepository, OrderRepository, RepositoryError, UserRepository,
};
use little_lemon_restaurant::forms::FieldErrors;

use crate::components::{DataTableConfig, TableFilter};
use crate::error::AppError;
use crate::forms::{FormData, FormField, SelectOption, sentence};

/// Result of validating and saving a form: field errors are not failures.
pub type SaveOutcome<T> = Result<Result<T, FieldErrors>, AppError>;

/// Every model shown in the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminModel {
    Menu,
    Booking,
    Category,
    Cart,
    MenuItem,
    Order,
    OrderItem,
    User,
}

impl AdminModel {
    /// Models in dashboard order.
    pub const ALL: [Self; 8] = [
        Self::Menu,
        Self::Booking,
        Self::Category,
        Self::Cart,
        Self::MenuItem,
        Self::Order,
        Self::OrderItem,
        Self::User,
    ];

    /// Look a model up by its URL segments.
    #[must_use]
    pub fn from_path(app: &str, model: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.app_label() == app && m.model_name() == model)
    }

    /// First URL segment.
    #[must_use]
    pub const fn app_label(self) -> &'static str {
        match self {
            Self::User => "auth",
            _ => "restaurant",
        }
    }

    /// Second URL segment.
    #[must_use]
    pub const fn model_name(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Booking => "booking",
            Self::Category => "category",
            Self::Cart => "cart",
            Self::MenuItem => "menuitem",
            Self::Order => "order",
            Self::OrderItem => "orderitem",
            Self::User => "user",
        }
    }

    #[must_use]
    pub const fn verbose_name(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Booking => "booking",
            Self::Category => "category",
            Self::Cart => "cart",
            Self::MenuItem => "menu item",
            Self::Order => "order",
            Self::OrderItem => "order item",
            Self::User => "user",
        }
    }

    #[must_use]
    pub const fn verbose_name_plural(self) -> &'static str {
        match self {
            Self::Menu => "Menus",
            Self::Booking => "Bookings",
            Self::Category => "Categories",
            Self::Cart => "Carts",
            Self::MenuItem => "Menu items",
            Self::Order => "Orders",
            Self::OrderItem => "Order items",
            Self::User => "Users",
        }
    }

    #[must_use]
    pub fn list_url(self) -> String {
        format!("/{}/{}/", self.app_label(), self.model_name())
    }

    #[must_use]
    pub fn add_url(self) -> String {
        format!("{}add/", self.list_url())
    }

    #[must_use]
    pub fn change_url(self, id: i64) -> String {
        format!("{}{id}/change/", self.list_url())
    }

    #[must_use]
    pub fn delete_url(self, id: i64) -> String {
        format!("{}{id}/delete/", self.list_url())
    }

    /// Columns, search box and filters of the change list.
    pub async fn table(self, pool: &SqlitePool) -> Result<DataTableConfig, RepositoryError> {
        let config = match self {
            Self::Menu => menu::table(),
            Self::Booking => booking::table(),
            Self::Category => category::table(),
            Self::Cart => cart::table(),
            Self::MenuItem => menu_item::table(),
            Self::Order => order::table(),
            Self::OrderItem => order_item::table(),
            Self::User => user::table(),
        };
        let filters: Vec<TableFilter> = match self {
            Self::Category => category::filters(pool).await?,
            _ => vec![],
        };
        Ok(filters.into_iter().fold(config, DataTableConfig::filter))
    }

    /// Rows of the change list, in admin ordering.
    pub async fn rows(
        self,
        pool: &SqlitePool,
        query: &ListQuery,
    ) -> Result<Vec<ListRow>, RepositoryError> {
        match self {
            Self::Menu => menu::rows(pool, query).await,
            Self::Booking => booking::rows(pool, query).await,
            Self::Category => category::rows(pool, query).await,
            Self::Cart => cart::rows(pool).await,
            Self::MenuItem => menu_item::rows(pool, query).await,
            Self::Order => order::rows(pool).await,
            Self::OrderItem => order_item::rows(pool).await,
            Self::User => user::rows(pool, query).await,
        }
    }

    /// Number of stored records.
    pub async fn count(self, pool: &SqlitePool) -> Result<i64, RepositoryError> {
        use little_lemon_restaurant::db::{
            BookingRepository, CartRepository, MenuRepository, OrderItemRepository,
        };

        match self {
            Self::Menu => MenuRepository::new(pool).count().await,
            Self::Booking => BookingRepository::new(pool).count().await,
            Self::Category => CategoryRepository::new(pool).count().await,
            Self::Cart => CartRepository::new(pool).count().await,
            Self::MenuItem => MenuItemRepository::new(pool).count().await,
            Self::Order => OrderRepository::new(pool).count().await,
            Self::OrderItem => OrderItemRepository::new(pool).count().await,
            Self::User => UserRepository::new(pool).count().await,
        }
    }

    /// Change form fields bound to `data` and `errors`.
    pub async fn fields(
        self,
        pool: &SqlitePool,
        mode: FormMode,
        data: &FormData,
        errors: &FieldErrors,
    ) -> Result<Vec<FormField>, RepositoryError> {
        let fields = match self {
            Self::Menu => menu::fields(),
            Self::Booking => booking::fields(),
            Self::Category => category::fields(),
            Self::Cart => cart::fields(pool).await?,
            Self::MenuItem => menu_item::fields(pool).await?,
            Self::Order => order::fields(pool).await?,
            Self::OrderItem => order_item::fields(pool).await?,
            Self::User => user::fields(mode),
        };
        Ok(fields
            .into_iter()
            .map(|field| field.bind(data, errors))
            .collect())
    }

    /// Initial values of an empty add form.
    #[must_use]
    pub fn defaults(self) -> FormData {
        match self {
            Self::Booking => booking::defaults(),
            Self::Order => order::defaults(),
            Self::Cart | Self::OrderItem => FormData::new().with("quantity", 1),
            _ => FormData::new(),
        }
    }

    /// Stored record as form values, or `None` if it does not exist.
    pub async fn instance(
        self,
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<Instance>, RepositoryError> {
        match self {
            Self::Menu => menu::instance(pool, id).await,
            Self::Booking => booking::instance(pool, id).await,
            Self::Category => category::instance(pool, id).await,
            Self::Cart => cart::instance(pool, id).await,
            Self::MenuItem => menu_item::instance(pool, id).await,
            Self::Order => order::instance(pool, id).await,
            Self::OrderItem => order_item::instance(pool, id).await,
            Self::User => user::instance(pool, id).await,
        }
    }

    /// Validate `data` and create (`id` is `None`) or update a record.
    pub async fn save(self, pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
        match self {
            Self::Menu => menu::save(pool, id, data).await,
            Self::Booking => booking::save(pool, id, data).await,
            Self::Category => category::save(pool, id, data).await,
            Self::Cart => cart::save(pool, id, data).await,
            Self::MenuItem => menu_item::save(pool, id, data).await,
            Self::Order => order::save(pool, id, data).await,
            Self::OrderItem => order_item::save(pool, id, data).await,
            Self::User => user::save(pool, id, data).await,
        }
    }

    /// Save the columns edited in place on the change list.
    ///
    /// Returns how many rows were updated.
    pub async fn save_list(self, pool: &SqlitePool, data: &FormData) -> SaveOutcome<usize> {
        match self {
            Self::Category => category::save_list(pool, data).await,
            Self::Order => order::save_list(pool, data).await,
            _ => Ok(Ok(0)),
        }
    }

    /// Delete a record.
    ///
    /// The inner `Err` carries the reason a delete was refused.
    pub async fn delete(self, pool: &SqlitePool, id: i64) -> Result<Result<(), String>, RepositoryError> {
        use little_lemon_core::{
            BookingId, CartId, CategoryId, MenuId, MenuItemId, OrderId, OrderItemId, UserId,
        };
        use little_lemon_restaurant::db::{
            BookingRepository, CartRepository, MenuRepository, OrderItemRepository,
        };

        let result = match self {
            Self::Menu => MenuRepository::new(pool).delete(MenuId::new(id)).await,
            Self::Booking => BookingRepository::new(pool).delete(BookingId::new(id)).await,
            Self::Category => CategoryRepository::new(pool).delete(CategoryId::new(id)).await,
            Self::Cart => CartRepository::new(pool).delete(CartId::new(id)).await,
            Self::MenuItem => MenuItemRepository::new(pool).delete(MenuItemId::new(id)).await,
            Self::Order => OrderRepository::new(pool).delete(OrderId::new(id)).await,
            Self::OrderItem => OrderItemRepository::new(pool).delete(OrderItemId::new(id)).await,
            Self::User => UserRepository::new(pool).delete(UserId::new(id)).await,
        };
        match result {
            Ok(()) => Ok(Ok(())),
            Err(RepositoryError::Conflict(reason)) => Ok(Err(sentence(&reason))),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Display for AdminModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verbose_name())
    }
}

/// Whether a form creates or changes a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Change,
}

/// Search text and filter values of a change list request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub filters: HashMap<String, String>,
}

impl ListQuery {
    /// Split query parameters into the `q` search and the rest.
    #[must_use]
    pub fn from_params(mut params: HashMap<String, String>) -> Self {
        let search = params
            .remove("q")
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        params.retain(|_, value| !value.trim().is_empty());
        Self {
            search,
            filters: params,
        }
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Whether `key` is currently filtered to `value`.
    #[must_use]
    pub fn is_filtered(&self, key: &str, value: &str) -> bool {
        self.filter(key) == Some(value)
    }
}

/// One change list cell: plain text, or an input when edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub edit: Option<FormField>,
}

impl Cell {
    pub fn text(value: impl fmt::Display) -> Self {
        Self {
            text: value.to_string(),
            edit: None,
        }
    }

    /// Render `value` as a yes/no marker.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::text(if value { "Yes" } else { "No" })
    }

    /// Cell holding an input named `<field>-<row id>`.
    #[must_use]
    pub fn editable(mut field: FormField, id: i64, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        field.name = format!("{}-{id}", field.name);
        field.value.clone_from(&value);
        Self {
            text: value,
            edit: Some(field),
        }
    }
}

/// One change list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: i64,
    pub display: String,
    pub cells: Vec<Cell>,
}

impl ListRow {
    pub fn new(id: impl Into<i64>, display: impl fmt::Display, cells: Vec<Cell>) -> Self {
        Self {
            id: id.into(),
            display: display.to_string(),
            cells,
        }
    }
}

/// A stored record loaded into a change form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub display: String,
    pub data: FormData,
}

/// A record after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub id: i64,
    pub display: String,
}

impl Saved {
    fn new(id: impl Into<i64>, display: impl fmt::Display) -> Self {
        Self {
            id: id.into(),
            display: display.to_string(),
        }
    }
}

/// Turn a constraint conflict into a form-level error.
fn conflict_as_form_error<T>(
    result: Result<T, RepositoryError>,
) -> Result<Result<T, FieldErrors>, RepositoryError> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(RepositoryError::Conflict(message)) => {
            let mut errors = FieldErrors::new();
            errors.add(FieldErrors::FORM, sentence(&message));
            Ok(Err(errors))
        }
        Err(e) => Err(e),
    }
}

async fn user_options(pool: &SqlitePool) -> Result<Vec<SelectOption>, RepositoryError> {
    let users = UserRepository::new(pool).list(None).await?;
    Ok(users
        .iter()
        .map(|u| SelectOption::new(u.id, &u.username))
        .collect())
}

async fn menu_item_options(pool: &SqlitePool) -> Result<Vec<SelectOption>, RepositoryError> {
    let items = MenuItemRepository::new(pool).list(None).await?;
    Ok(items
        .iter()
        .map(|line| SelectOption::new(line.item.id, &line.item))
        .collect())
}

async fn category_options(pool: &SqlitePool) -> Result<Vec<SelectOption>, RepositoryError> {
    let categories = CategoryRepository::new(pool).list(None, None).await?;
    Ok(categories
        .iter()
        .map(|c| SelectOption::new(c.id, c))
        .collect())
}

async fn order_options(pool: &SqlitePool) -> Result<Vec<SelectOption>, RepositoryError> {
    let orders = OrderRepository::new(pool).list().await?;
    Ok(orders
        .iter()
        .map(|line| SelectOption::new(line.order.id, &line.order))
        .collect())
}
