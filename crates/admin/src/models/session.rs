//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use little_lemon_core::{UserId, Username};
use little_lemon_restaurant::models::User;

/// Session-stored staff identity.
///
/// Minimal data stored in the session to identify the logged-in staff user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStaff {
    /// User's database ID.
    pub id: UserId,
    /// User's login name.
    pub username: Username,
}

impl From<&User> for CurrentStaff {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Session keys for admin data.
pub mod keys {
    /// Key for storing the current logged-in staff user.
    pub const CURRENT_STAFF: &str = "current_staff";

    /// Key for a one-shot message shown on the next page.
    pub const FLASH: &str = "flash";
}
