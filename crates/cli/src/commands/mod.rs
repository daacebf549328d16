//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use sqlx::SqlitePool;

use little_lemon_restaurant::config::get_database_url;
use little_lemon_restaurant::db;

/// Open the database named by `DATABASE_URL`.
async fn connect() -> Result<SqlitePool, sqlx::Error> {
    dotenvy::dotenv().ok();
    let database_url = get_database_url("DATABASE_URL");
    db::create_pool(&database_url).await
}
