//! Menu route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use little_lemon_core::MenuId;

use crate::db::MenuRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Menu;
use crate::state::AppState;

/// Menu listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub menus: Vec<Menu>,
}

/// Menu entry detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu_item.html")]
pub struct MenuItemTemplate {
    pub menu: Menu,
}

/// Display every menu entry ordered by name.
///
/// # Errors
///
/// Returns 500 if the menu cannot be loaded.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<MenuTemplate> {
    let menus = MenuRepository::new(state.pool()).list_by_name().await?;
    Ok(MenuTemplate { menus })
}

/// Display a single menu entry.
///
/// # Errors
///
/// Returns 404 if no menu entry has this ID.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<MenuItemTemplate> {
    let menu = MenuRepository::new(state.pool())
        .get(MenuId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("menu {id}")))?;
    Ok(MenuItemTemplate { menu })
}
