//! Login and logout for staff accounts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Query, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use little_lemon_restaurant::error::add_breadcrumb;
use little_lemon_restaurant::filters;
use little_lemon_restaurant::services::{AuthError, AuthService};

use super::Page;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{OptionalStaff, clear_current_staff, set_current_staff};
use crate::models::CurrentStaff;
use crate::state::AppState;

const INVALID_LOGIN: &str = "Please enter the correct username and password for a staff account. \
     Note that both fields may be case-sensitive.";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: Page,
    pub next: String,
    pub username: String,
    pub error: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Login form submission.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Render the login page, or skip it when already logged in.
///
/// GET /login/
#[instrument(skip(staff))]
pub async fn login_page(
    OptionalStaff(staff): OptionalStaff,
    Query(query): Query<LoginQuery>,
) -> Response {
    let next = safe_next(query.next.as_deref()).to_string();
    if staff.is_some() {
        return Redirect::to(&next).into_response();
    }
    LoginTemplate {
        page: Page::default(),
        next,
        username: String::new(),
        error: None,
    }
    .into_response()
}

/// Check credentials and start a staff session.
///
/// POST /login/
///
/// # Errors
///
/// Returns 500 if the user store or session store fails.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Response> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let next = safe_next(form.next.as_deref()).to_string();

    match AuthService::new(state.pool())
        .login_staff(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            let staff = CurrentStaff::from(&user);
            set_current_staff(&session, &staff).await?;
            set_sentry_user(staff.id, staff.username.as_str());
            add_breadcrumb("auth", "Staff login");
            tracing::info!(user_id = %staff.id, username = %staff.username, "Staff logged in");
            Ok(Redirect::to(&next).into_response())
        }
        Err(AuthError::InvalidCredentials | AuthError::NotStaff | AuthError::InvalidUsername(_)) => {
            tracing::info!(username = %form.username, "Rejected staff login");
            Ok(LoginTemplate {
                page: Page::default(),
                next,
                username: form.username,
                error: Some(INVALID_LOGIN.to_string()),
            }
            .into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// End the session.
///
/// POST /logout/
///
/// # Errors
///
/// Returns 500 if the session cannot be flushed.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_staff(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(LOGIN_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_rejects_other_hosts() {
        assert_eq!(safe_next(Some("/restaurant/menu/?q=x")), "/restaurant/menu/?q=x");
        assert_eq!(safe_next(Some("//evil.example/")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(None), "/");
    }
}
