//! User domain types.

use core::fmt;

use chrono::{DateTime, Utc};

use little_lemon_core::{UserId, Username};

/// An account: staff, customer or delivery crew.
///
/// The password hash never leaves the repository; see
/// [`UserRepository::password_hash`](crate::db::UserRepository::password_hash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// Whether the user may sign in to the admin panel.
    pub is_staff: bool,
    /// When the account was created.
    pub date_joined: DateTime<Utc>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}
