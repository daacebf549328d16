//! User accounts. Passwords are set through the auth service, never stored
//! or shown as entered.

use sqlx::SqlitePool;

use little_lemon_core::{UserId, Username};
use little_lemon_restaurant::db::{RepositoryError, UserRepository};
use little_lemon_restaurant::forms::FieldErrors;
use little_lemon_restaurant::services::{AuthError, AuthService};

use super::{Cell, FormMode, Instance, ListQuery, ListRow, SaveOutcome, Saved};
use crate::components::{DataTableConfig, TableColumn};
use crate::error::AppError;
use crate::forms::{FormData, FormField, Validator, sentence};

const TAKEN: &str = "A user with that username already exists.";

pub(super) fn table() -> DataTableConfig {
    DataTableConfig::new("user")
        .column(TableColumn::new("username", "Username"))
        .column(TableColumn::new("is_staff", "Staff status"))
        .column(TableColumn::new("date_joined", "Date joined"))
        .search_placeholder("Search by username")
        .empty_state("No users yet")
}

pub(super) async fn rows(
    pool: &SqlitePool,
    query: &ListQuery,
) -> Result<Vec<ListRow>, RepositoryError> {
    let users = UserRepository::new(pool).list(query.search()).await?;
    Ok(users
        .into_iter()
        .map(|user| {
            let cells = vec![
                Cell::text(&user.username),
                Cell::boolean(user.is_staff),
                Cell::text(user.date_joined.format("%Y-%m-%d %H:%M")),
            ];
            ListRow::new(user.id, &user, cells)
        })
        .collect())
}

pub(super) fn fields(mode: FormMode) -> Vec<FormField> {
    let username = FormField::text("username", "Username", Username::MAX_LENGTH)
        .help("Letters, digits and @/./+/-/_ only.");
    let is_staff = FormField::checkbox("is_staff", "Staff status")
        .help("Designates whether the user can log into this admin site.");
    match mode {
        FormMode::Add => vec![
            username,
            FormField::password("password", "Password"),
            FormField::password("password2", "Password confirmation")
                .help("Enter the same password as before, for verification."),
            is_staff,
        ],
        FormMode::Change => vec![
            username,
            is_staff,
            FormField::password("password", "New password")
                .optional()
                .help("Leave blank to keep the current password."),
        ],
    }
}

pub(super) async fn instance(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Instance>, RepositoryError> {
    let user = UserRepository::new(pool).get_by_id(UserId::new(id)).await?;
    Ok(user.map(|user| {
        let mut data = FormData::new().with("username", &user.username);
        data.insert_checkbox("is_staff", user.is_staff);
        Instance {
            display: user.to_string(),
            data,
        }
    }))
}

/// Sort an auth failure into field errors or a server error.
fn auth_failure(err: AuthError) -> SaveOutcome<Saved> {
    let mut errors = FieldErrors::new();
    match err {
        AuthError::InvalidUsername(e) => errors.add("username", sentence(&e.to_string())),
        AuthError::UserAlreadyExists => errors.add("username", TAKEN),
        AuthError::WeakPassword(reason) => errors.add("password", sentence(&reason)),
        AuthError::Repository(e) => return Err(e.into()),
        other => return Err(AppError::Internal(other.to_string())),
    }
    Ok(Err(errors))
}

async fn add(pool: &SqlitePool, data: &FormData) -> SaveOutcome<Saved> {
    let mut v = Validator::new(data);
    let username = v.username("username");
    let password = v.text("password", 128);
    let confirmation = v.text("password2", 128);
    if let (Some(password), Some(confirmation)) = (&password, &confirmation) {
        if password != confirmation {
            v.error("password2", "The two password fields didn't match.");
        }
    }
    let is_staff = v.checkbox("is_staff");
    let (username, password) = match v.finish(username.zip(password)) {
        Ok(valid) => valid,
        Err(errors) => return Ok(Err(errors)),
    };

    match AuthService::new(pool)
        .create_user(username.as_str(), &password, is_staff)
        .await
    {
        Ok(user) => Ok(Ok(Saved::new(user.id, &user))),
        Err(e) => auth_failure(e),
    }
}

async fn change(pool: &SqlitePool, id: UserId, data: &FormData) -> SaveOutcome<Saved> {
    let mut v = Validator::new(data);
    let username = v.username("username");
    let is_staff = v.checkbox("is_staff");
    let username = match v.finish(username) {
        Ok(username) => username,
        Err(errors) => return Ok(Err(errors)),
    };

    let user = match UserRepository::new(pool).update(id, &username, is_staff).await {
        Ok(user) => user,
        Err(RepositoryError::Conflict(_)) => {
            let mut errors = FieldErrors::new();
            errors.add("username", TAKEN);
            return Ok(Err(errors));
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(password) = data.get("password") {
        if let Err(e) = AuthService::new(pool).set_password(&user, password).await {
            return auth_failure(e);
        }
    }
    Ok(Ok(Saved::new(user.id, &user)))
}

pub(super) async fn save(pool: &SqlitePool, id: Option<i64>, data: &FormData) -> SaveOutcome<Saved> {
    match id {
        None => add(pool, data).await,
        Some(id) => change(pool, UserId::new(id), data).await,
    }
}
