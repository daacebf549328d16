//! Home and about page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::MenuItemRepository;
use crate::error::Result;
use crate::filters;
use crate::models::MenuItemLine;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub featured: Vec<MenuItemLine>,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate;

/// Display the home page with featured menu items.
///
/// # Errors
///
/// Returns 500 if the menu items cannot be loaded.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<HomeTemplate> {
    let featured = MenuItemRepository::new(state.pool()).list_featured().await?;
    Ok(HomeTemplate { featured })
}

/// Display the about page.
#[instrument]
pub async fn about() -> AboutTemplate {
    AboutTemplate
}
