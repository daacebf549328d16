//! Authentication extractors and session helpers for admin.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentStaff, session_keys};

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login/";

/// Extractor that requires a logged-in staff user.
///
/// Anonymous requests are redirected to the login page with the requested
/// path in `next`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireStaff(staff): RequireStaff) -> String {
///     format!("Hello, {}!", staff.username)
/// }
/// ```
pub struct RequireStaff(pub CurrentStaff);

/// Error returned when a staff session is required but missing.
pub enum StaffAuthRejection {
    /// Redirect to the login page, remembering where to return.
    RedirectToLogin(String),
    /// The session layer is not installed.
    MissingSession,
}

impl IntoResponse for StaffAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(next) => Redirect::to(&format!(
                "{LOGIN_PATH}?next={}",
                urlencoding::encode(&next)
            ))
            .into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = StaffAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(StaffAuthRejection::MissingSession)?;

        let staff: CurrentStaff = session
            .get(session_keys::CURRENT_STAFF)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                let next = parts
                    .uri
                    .path_and_query()
                    .map_or("/", |pq| pq.as_str())
                    .to_string();
                StaffAuthRejection::RedirectToLogin(next)
            })?;

        Ok(Self(staff))
    }
}

/// Extractor that optionally gets the current staff user.
pub struct OptionalStaff(pub Option<CurrentStaff>);

impl<S> FromRequestParts<S> for OptionalStaff
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let staff = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentStaff>(session_keys::CURRENT_STAFF)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(staff))
    }
}

/// Helper to set the current staff user in the session.
///
/// The session ID is cycled first so a pre-login ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_staff(
    session: &Session,
    staff: &CurrentStaff,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_STAFF, staff).await
}

/// Helper to end the staff session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn clear_current_staff(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Store a message to show on the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, message.into()).await
}

/// Remove and return the pending flash message, if any.
pub async fn take_flash(session: &Session) -> Option<String> {
    session
        .remove::<String>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}
