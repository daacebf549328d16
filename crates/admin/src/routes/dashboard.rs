//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use little_lemon_restaurant::filters;

use super::Page;
use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::registry::AdminModel;
use crate::state::AppState;

/// One model on the dashboard.
#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub name: &'static str,
    pub list_url: String,
    pub add_url: String,
    pub count: i64,
}

/// Models grouped under their app.
#[derive(Debug, Clone)]
pub struct AppGroup {
    pub label: &'static str,
    pub models: Vec<ModelSummary>,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page: Page,
    pub apps: Vec<AppGroup>,
}

fn app_title(app_label: &str) -> &'static str {
    match app_label {
        "auth" => "Authentication and Authorization",
        _ => "Restaurant",
    }
}

/// Dashboard listing every model with its row count.
///
/// GET /
///
/// # Errors
///
/// Returns 500 if a count query fails.
#[instrument(skip(state, session, staff))]
pub async fn index(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate> {
    let mut apps: Vec<AppGroup> = Vec::new();
    for model in AdminModel::ALL {
        let summary = ModelSummary {
            name: model.verbose_name_plural(),
            list_url: model.list_url(),
            add_url: model.add_url(),
            count: model.count(state.pool()).await?,
        };
        let label = app_title(model.app_label());
        match apps.iter_mut().find(|group| group.label == label) {
            Some(group) => group.models.push(summary),
            None => apps.push(AppGroup {
                label,
                models: vec![summary],
            }),
        }
    }
    apps.sort_by_key(|group| group.label);

    Ok(DashboardTemplate {
        page: Page::for_staff(&session, staff).await,
        apps,
    })
}
