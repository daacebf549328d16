//! Integration tests for Little Lemon.
//!
//! Each test builds a complete router over a fresh in-memory database and
//! drives it with `tower::ServiceExt::oneshot`; no server or external
//! database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p little-lemon-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `models` - Data model properties against the repositories
//! - `booking_views` - Public booking form, reservations page and JSON API
//! - `admin_screens` - Staff login, change lists, inline edits and deletes

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use sqlx::SqlitePool;
use tower::ServiceExt;

use little_lemon_admin::config::AdminConfig;
use little_lemon_restaurant::config::RestaurantConfig;
use little_lemon_restaurant::db;
use little_lemon_restaurant::models::User;
use little_lemon_restaurant::services::AuthService;

/// A migrated in-memory database.
pub async fn migrated_pool() -> SqlitePool {
    let pool = db::create_memory_pool()
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to apply migrations");
    pool
}

/// Create an account through the auth service.
pub async fn create_user(pool: &SqlitePool, username: &str, password: &str, is_staff: bool) -> User {
    AuthService::new(pool)
        .create_user(username, password, is_staff)
        .await
        .expect("Failed to create user")
}

/// A router under test plus the database behind it.
///
/// Cookies set by responses are replayed on later requests, so a login
/// carries over the way it would in a browser.
pub struct TestApp {
    router: Router,
    pub pool: SqlitePool,
    cookie: Option<String>,
}

impl TestApp {
    /// The public restaurant site.
    pub async fn restaurant() -> Self {
        let pool = migrated_pool().await;
        let state = little_lemon_restaurant::state::AppState::new(
            RestaurantConfig::for_tests(),
            pool.clone(),
        );
        Self {
            router: little_lemon_restaurant::app(state),
            pool,
            cookie: None,
        }
    }

    /// The admin panel, with sessions stored in the same database.
    pub async fn admin() -> Self {
        let pool = migrated_pool().await;
        let store = little_lemon_admin::middleware::create_session_store(&pool)
            .await
            .expect("Failed to create session store");
        let state = little_lemon_admin::state::AppState::new(AdminConfig::for_tests(), pool.clone());
        Self {
            router: little_lemon_admin::app(state, store),
            pool,
            cookie: None,
        }
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty());
        self.send(request.expect("Failed to build request")).await
    }

    /// Send a form-urlencoded POST request.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body));
        self.send(request.expect("Failed to build request")).await
    }

    /// Send a JSON POST request.
    pub async fn post_json(&mut self, uri: &str, body: &serde_json::Value) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()));
        self.send(request.expect("Failed to build request")).await
    }

    /// Sign in to the admin panel and expect the redirect that follows.
    pub async fn login(&mut self, username: &str, password: &str) {
        let response = self
            .post_form(
                "/login/",
                &[("username", username), ("password", password), ("next", "/")],
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login failed: {}", response.body);
        assert!(self.cookie.is_some(), "login did not set a session cookie");
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let Ok(response) = self.router.clone().oneshot(request).await;

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// Parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}
