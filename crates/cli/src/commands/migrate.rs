//! Database migration commands.

use tracing::info;

use little_lemon_restaurant::db;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Running database migrations...");

    let pool = super::connect().await?;
    db::run_migrations(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
