//! Little Lemon admin panel library.
//!
//! Staff users log in with a username and password and get list, search,
//! filter, add, change and delete screens over every restaurant model.
//! [`app`] builds the complete router so that the binary and the
//! integration tests serve the same stack.
//!
//! # Security
//!
//! Every page except `/login/` and the health checks requires a staff
//! session. Sessions are stored in `SQLite` next to the restaurant data.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod registry;
pub mod routes;
pub mod state;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions_sqlx_store::SqliteStore;

use little_lemon_restaurant::middleware::request_id_middleware;

use middleware::{create_session_layer, security_headers_middleware};
use state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Build the admin router with sessions kept in `store`.
pub fn app(state: AppState, store: SqliteStore) -> Router {
    let session_layer = create_session_layer(store, state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
