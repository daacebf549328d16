//! Account management commands.

use thiserror::Error;
use tracing::info;

use little_lemon_restaurant::services::{AuthError, AuthService};

/// Errors that can occur while creating an account.
#[derive(Debug, Error)]
pub enum UserError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Username taken.
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Rejected by account validation.
    #[error("Cannot create {0}: {1}")]
    Invalid(String, AuthError),
}

/// Create an account.
///
/// # Errors
///
/// Returns `UserError::UserExists` if the username is taken, or
/// `UserError::Invalid` if the username or password is rejected.
pub async fn create(username: &str, password: &str, is_staff: bool) -> Result<(), UserError> {
    let pool = super::connect().await?;

    let user = AuthService::new(&pool)
        .create_user(username, password, is_staff)
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => UserError::UserExists(username.to_string()),
            other => UserError::Invalid(username.to_string(), other),
        })?;

    info!(
        user_id = %user.id,
        username = %user.username,
        is_staff = user.is_staff,
        "Created user"
    );
    Ok(())
}
