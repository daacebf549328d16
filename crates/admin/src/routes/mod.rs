//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Dashboard with every model and its row count
//!
//! # Auth (username and password, staff accounts only)
//! GET  /login/                          - Login page
//! POST /login/                          - Check credentials, start the session
//! POST /logout/                         - End the session
//!
//! # Models ({app}/{model} is e.g. restaurant/menu or auth/user)
//! GET  /{app}/{model}/                  - Change list (?q= search, filter params)
//! POST /{app}/{model}/                  - Save columns edited in place
//! GET  /{app}/{model}/add/              - Add form
//! POST /{app}/{model}/add/              - Create
//! GET  /{app}/{model}/{id}/change/      - Change form
//! POST /{app}/{model}/{id}/change/      - Update
//! GET  /{app}/{model}/{id}/delete/      - Delete confirmation
//! POST /{app}/{model}/{id}/delete/      - Delete
//! ```

pub mod auth;
pub mod dashboard;
pub mod models;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::middleware::take_flash;
use crate::models::CurrentStaff;
use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/logout/", post(auth::logout))
        .route(
            "/{app}/{model}/",
            get(models::change_list).post(models::save_change_list),
        )
        .route(
            "/{app}/{model}/add/",
            get(models::add_page).post(models::add),
        )
        .route(
            "/{app}/{model}/{id}/change/",
            get(models::change_page).post(models::change),
        )
        .route(
            "/{app}/{model}/{id}/delete/",
            get(models::delete_page).post(models::delete),
        )
}

/// Header and message area shared by every admin page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Logged-in staff user; `None` on the login page.
    pub staff: Option<CurrentStaff>,
    /// One-shot message left by the previous request.
    pub flash: Option<String>,
}

impl Page {
    /// Page chrome for `staff`, consuming any pending flash message.
    pub async fn for_staff(session: &Session, staff: CurrentStaff) -> Self {
        Self {
            staff: Some(staff),
            flash: take_flash(session).await,
        }
    }
}
