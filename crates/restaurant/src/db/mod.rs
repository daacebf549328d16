//! Database operations for the Little Lemon `SQLite` database.
//!
//! ## Tables
//!
//! - `users` - Accounts for staff, customers and delivery crew
//! - `categories` - Menu item groupings
//! - `menus` - Printed menu entries shown on the public site
//! - `menu_items` - Sellable items, each in one category
//! - `carts` - One row per (user, menu item)
//! - `orders` - Customer orders with optional delivery crew
//! - `order_items` - One row per (order, menu item)
//! - `bookings` - Table reservations
//!
//! # Migrations
//!
//! Migrations are stored in `crates/restaurant/migrations/` and embedded in
//! [`MIGRATOR`]. Run them via:
//! ```bash
//! cargo run -p little-lemon-cli -- migrate
//! ```

pub mod bookings;
pub mod carts;
pub mod categories;
pub mod menu_items;
pub mod menus;
pub mod order_items;
pub mod orders;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use thiserror::Error;

pub use bookings::BookingRepository;
pub use carts::CartRepository;
pub use categories::CategoryRepository;
pub use menu_items::MenuItemRepository;
pub use menus::MenuRepository;
pub use order_items::OrderItemRepository;
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Extended result code for a constraint raised by a trigger or a RESTRICT action.
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate row, dangling or still-referenced key).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify a failed write.
    ///
    /// Unique and check violations become `Conflict(unique_message)`; foreign
    /// key violations become a `Conflict` describing the broken reference.
    pub(crate) fn from_write(err: sqlx::Error, unique_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() || db_err.is_check_violation() {
                return Self::Conflict(unique_message.to_owned());
            }
            if db_err.is_foreign_key_violation()
                || db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER)
            {
                return Self::Conflict(
                    "a related record is missing or still references this one".to_owned(),
                );
            }
        }
        Self::Database(err)
    }
}

/// Create an `SQLite` connection pool for a database file.
///
/// The file is created if missing. Connections use WAL journaling, enforce
/// foreign keys and wait up to five seconds on a locked database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a pool over a private in-memory database.
///
/// The pool holds exactly one connection that never expires, so every query
/// sees the same database. Used by tests.
///
/// # Errors
///
/// Returns `sqlx::Error` if `SQLite` cannot be initialized.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history
/// diverges from the embedded migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
