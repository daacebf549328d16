//! Change list, add, change and delete screens for every registered model.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Path, Query, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use little_lemon_restaurant::error::add_breadcrumb;
use little_lemon_restaurant::filters;
use little_lemon_restaurant::forms::FieldErrors;

use super::Page;
use crate::components::DataTableConfig;
use crate::error::{AppError, Result};
use crate::forms::{FormData, FormField};
use crate::middleware::{RequireStaff, set_flash};
use crate::registry::{AdminModel, FormMode, ListQuery, ListRow};
use crate::state::AppState;

/// Change list template.
#[derive(Template, WebTemplate)]
#[template(path = "change_list.html")]
pub struct ChangeListTemplate {
    pub page: Page,
    pub title: &'static str,
    pub verbose_name: &'static str,
    pub list_url: String,
    pub add_url: String,
    pub table: DataTableConfig,
    pub rows: Vec<ListRow>,
    pub query: ListQuery,
    pub errors: Vec<String>,
}

/// Add and change form template.
#[derive(Template, WebTemplate)]
#[template(path = "change_form.html")]
pub struct ChangeFormTemplate {
    pub page: Page,
    pub title: String,
    pub plural: &'static str,
    pub list_url: String,
    pub action: String,
    pub fields: Vec<FormField>,
    pub errors: Vec<String>,
    pub delete_url: Option<String>,
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "delete_confirmation.html")]
pub struct DeleteTemplate {
    pub page: Page,
    pub verbose_name: &'static str,
    pub plural: &'static str,
    pub list_url: String,
    pub change_url: String,
    pub display: String,
    /// Why the delete was refused.
    pub refusal: Option<String>,
}

fn resolve(app: &str, model: &str) -> Result<AdminModel> {
    AdminModel::from_path(app, model)
        .ok_or_else(|| AppError::NotFound(format!("admin model {app}/{model}")))
}

fn not_found(model: AdminModel, id: i64) -> AppError {
    AppError::NotFound(format!("{model} {id}"))
}

async fn render_list(
    state: &AppState,
    page: Page,
    model: AdminModel,
    query: ListQuery,
    submitted: Option<(&FormData, &FieldErrors)>,
) -> Result<ChangeListTemplate> {
    let table = model.table(state.pool()).await?;
    let mut rows = model.rows(state.pool(), &query).await?;
    let mut errors = Vec::new();

    if let Some((data, field_errors)) = submitted {
        for field in rows
            .iter_mut()
            .flat_map(|row| row.cells.iter_mut())
            .filter_map(|cell| cell.edit.as_mut())
        {
            let submitted_value = data.raw(&field.name).to_string();
            field.value = submitted_value;
            field.errors = field_errors.get(&field.name).to_vec();
        }
        errors.push("Please correct the errors below.".to_string());
        errors.extend(field_errors.get(FieldErrors::FORM).iter().cloned());
    }

    Ok(ChangeListTemplate {
        page,
        title: model.verbose_name_plural(),
        verbose_name: model.verbose_name(),
        list_url: model.list_url(),
        add_url: model.add_url(),
        table,
        rows,
        query,
        errors,
    })
}

/// List a model's records.
///
/// GET /{app}/{model}/
///
/// # Errors
///
/// Returns 404 for an unknown model, 500 if the query fails.
#[instrument(skip(state, session, staff))]
pub async fn change_list(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
    Path((app, model)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ChangeListTemplate> {
    let model = resolve(&app, &model)?;
    let page = Page::for_staff(&session, staff).await;
    render_list(&state, page, model, ListQuery::from_params(params), None).await
}

/// Save the columns edited in place on the change list.
///
/// POST /{app}/{model}/
///
/// # Errors
///
/// Returns 404 for an unknown model, 500 if saving fails.
#[instrument(skip(state, session, staff, pairs))]
pub async fn save_change_list(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
    Path((app, model)): Path<(String, String)>,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<HashMap<String, String>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let model = resolve(&app, &model)?;
    let data = FormData::from(pairs);

    match model.save_list(state.pool(), &data).await? {
        Ok(changed) => {
            add_breadcrumb("admin", &format!("Edited {changed} {model} rows in place"));
            if changed > 0 {
                let noun = if changed == 1 {
                    model.verbose_name()
                } else {
                    model.verbose_name_plural()
                };
                set_flash(
                    &session,
                    format!("{changed} {} changed successfully.", noun.to_lowercase()),
                )
                .await?;
            }
            let target = raw_query.map_or_else(
                || model.list_url(),
                |q| format!("{}?{q}", model.list_url()),
            );
            Ok(Redirect::to(&target).into_response())
        }
        Err(errors) => {
            let page = Page::for_staff(&session, staff).await;
            let query = ListQuery::from_params(params);
            Ok(render_list(&state, page, model, query, Some((&data, &errors)))
                .await?
                .into_response())
        }
    }
}

/// Where to go after a successful save, following the clicked button.
fn after_save(model: AdminModel, data: &FormData, id: i64) -> String {
    if data.get("_addanother").is_some() {
        model.add_url()
    } else if data.get("_continue").is_some() {
        model.change_url(id)
    } else {
        model.list_url()
    }
}

async fn form_page(
    state: &AppState,
    page: Page,
    model: AdminModel,
    id: Option<i64>,
    display: Option<String>,
    data: &FormData,
    errors: &FieldErrors,
) -> Result<ChangeFormTemplate> {
    let mode = if id.is_some() {
        FormMode::Change
    } else {
        FormMode::Add
    };
    let fields = model.fields(state.pool(), mode, data, errors).await?;
    let mut form_errors = Vec::new();
    if !errors.is_empty() {
        form_errors.push("Please correct the errors below.".to_string());
        form_errors.extend(errors.get(FieldErrors::FORM).iter().cloned());
    }

    let (title, action, delete_url) = match (id, display) {
        (Some(id), Some(display)) => (
            format!("Change {}: {display}", model.verbose_name()),
            model.change_url(id),
            Some(model.delete_url(id)),
        ),
        _ => (
            format!("Add {}", model.verbose_name()),
            model.add_url(),
            None,
        ),
    };

    Ok(ChangeFormTemplate {
        page,
        title,
        plural: model.verbose_name_plural(),
        list_url: model.list_url(),
        action,
        fields,
        errors: form_errors,
        delete_url,
    })
}

/// Show an empty add form.
///
/// GET /{app}/{model}/add/
///
/// # Errors
///
/// Returns 404 for an unknown model, 500 if select options cannot be loaded.
#[instrument(skip(state, session, staff))]
pub async fn add_page(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
    Path((app, model)): Path<(String, String)>,
) -> Result<ChangeFormTemplate> {
    let model = resolve(&app, &model)?;
    let page = Page::for_staff(&session, staff).await;
    let data = model.defaults();
    form_page(&state, page, model, None, None, &data, &FieldErrors::new()).await
}

/// Create a record.
///
/// POST /{app}/{model}/add/
///
/// # Errors
///
/// Returns 404 for an unknown model, 500 if saving fails.
#[instrument(skip(state, session, staff, pairs))]
pub async fn add(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
    Path((app, model)): Path<(String, String)>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let model = resolve(&app, &model)?;
    let data = FormData::from(pairs);

    match model.save(state.pool(), None, &data).await? {
        Ok(saved) => {
            add_breadcrumb("admin", &format!("Added {model} {}", saved.id));
            tracing::info!(model = %model, id = saved.id, staff = %staff.username, "Record added");
            set_flash(
                &session,
                format!(
                    "The {model} \u{201c}{}\u{201d} was added successfully.",
                    saved.display
                ),
            )
            .await?;
            Ok(Redirect::to(&after_save(model, &data, saved.id)).into_response())
        }
        Err(errors) => {
            let page = Page::for_staff(&session, staff).await;
            Ok(form_page(&state, page, model, None, None, &data, &errors)
                .await?
                .into_response())
        }
    }
}

/// Show the change form of a record.
///
/// GET /{app}/{model}/{id}/change/
///
/// # Errors
///
/// Returns 404 for an unknown model or record.
#[instrument(skip(state, session, staff))]
pub async fn change_page(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
    Path((app, model, id)): Path<(String, String, i64)>,
) -> Result<ChangeFormTemplate> {
    let model = resolve(&app, &model)?;
    let instance = model
        .instance(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(model, id))?;
    let page = Page::for_staff(&session, staff).await;
    form_page(
        &state,
        page,
        model,
        Some(id),
        Some(instance.display),
        &instance.data,
        &FieldErrors::new(),
    )
    .await
}

/// Update a record.
///
/// POST /{app}/{model}/{id}/change/
///
/// # Errors
///
/// Returns 404 for an unknown model or record, 500 if saving fails.
#[instrument(skip(state, session, staff, pairs))]
pub async fn change(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
    Path((app, model, id)): Path<(String, String, i64)>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let model = resolve(&app, &model)?;
    let instance = model
        .instance(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(model, id))?;
    let data = FormData::from(pairs);

    match model.save(state.pool(), Some(id), &data).await? {
        Ok(saved) => {
            add_breadcrumb("admin", &format!("Changed {model} {id}"));
            tracing::info!(model = %model, id, staff = %staff.username, "Record changed");
            set_flash(
                &session,
                format!(
                    "The {model} \u{201c}{}\u{201d} was changed successfully.",
                    saved.display
                ),
            )
            .await?;
            Ok(Redirect::to(&after_save(model, &data, id)).into_response())
        }
        Err(errors) => {
            let page = Page::for_staff(&session, staff).await;
            Ok(form_page(
                &state,
                page,
                model,
                Some(id),
                Some(instance.display),
                &data,
                &errors,
            )
            .await?
            .into_response())
        }
    }
}

/// Ask for confirmation before deleting a record.
///
/// GET /{app}/{model}/{id}/delete/
///
/// # Errors
///
/// Returns 404 for an unknown model or record.
#[instrument(skip(state, session, staff))]
pub async fn delete_page(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
    Path((app, model, id)): Path<(String, String, i64)>,
) -> Result<DeleteTemplate> {
    let model = resolve(&app, &model)?;
    let instance = model
        .instance(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(model, id))?;

    Ok(DeleteTemplate {
        page: Page::for_staff(&session, staff).await,
        verbose_name: model.verbose_name(),
        plural: model.verbose_name_plural(),
        list_url: model.list_url(),
        change_url: model.change_url(id),
        display: instance.display,
        refusal: None,
    })
}

/// Delete a record, or explain why it cannot be deleted.
///
/// POST /{app}/{model}/{id}/delete/
///
/// # Errors
///
/// Returns 404 for an unknown model or record, 500 if the delete fails.
#[instrument(skip(state, session, staff))]
pub async fn delete(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    session: Session,
    Path((app, model, id)): Path<(String, String, i64)>,
) -> Result<Response> {
    let model = resolve(&app, &model)?;
    let instance = model
        .instance(state.pool(), id)
        .await?
        .ok_or_else(|| not_found(model, id))?;

    match model.delete(state.pool(), id).await? {
        Ok(()) => {
            add_breadcrumb("admin", &format!("Deleted {model} {id}"));
            tracing::info!(model = %model, id, staff = %staff.username, "Record deleted");
            set_flash(
                &session,
                format!(
                    "The {model} \u{201c}{}\u{201d} was deleted successfully.",
                    instance.display
                ),
            )
            .await?;
            Ok(Redirect::to(&model.list_url()).into_response())
        }
        Err(reason) => {
            tracing::info!(model = %model, id, reason = %reason, "Delete refused");
            Ok(DeleteTemplate {
                page: Page::for_staff(&session, staff).await,
                verbose_name: model.verbose_name(),
                plural: model.verbose_name_plural(),
                list_url: model.list_url(),
                change_url: model.change_url(id),
                refusal: Some(format!(
                    "Cannot delete {model} \u{201c}{}\u{201d}: {reason}",
                    instance.display
                )),
                display: instance.display,
            }
            .into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_after_save_follows_button() {
        let data = FormData::new().with("_continue", "Save and continue editing");
        assert_eq!(
            after_save(AdminModel::Menu, &data, 4),
            "/restaurant/menu/4/change/"
        );
        let data = FormData::new().with("_addanother", "Save and add another");
        assert_eq!(after_save(AdminModel::User, &data, 4), "/auth/user/add/");
        assert_eq!(
            after_save(AdminModel::Booking, &FormData::new(), 4),
            "/restaurant/booking/"
        );
    }

    #[test]
    fn test_unknown_model_is_not_found() {
        assert!(matches!(resolve("restaurant", "pizza"), Err(AppError::NotFound(_))));
        assert_eq!(resolve("auth", "user").ok(), Some(AdminModel::User));
    }
}
