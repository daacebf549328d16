//! HTTP route handlers for the restaurant site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured menu items)
//! GET  /about/                 - About page
//! GET  /menu/                  - Menu listing
//! GET  /menu/{id}/             - Menu entry detail
//! GET  /book/                  - Booking form
//! POST /book/                  - Submit booking form
//! GET  /reservations/          - Bookings, optionally ?date=YYYY-MM-DD
//!
//! # JSON API
//! GET  /api/bookings/          - Bookings on ?date= (default: today)
//! POST /api/bookings/          - Create a booking
//! ```

pub mod api;
pub mod bookings;
pub mod menu;
pub mod pages;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::index))
        .route("/{id}/", get(menu::show))
}

/// Create the booking API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route(
        "/bookings/",
        get(api::bookings::list).post(api::bookings::create),
    )
}

/// Create all routes for the restaurant site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about/", get(pages::about))
        .nest("/menu", menu_routes())
        .route("/book/", get(bookings::book_page).post(bookings::book))
        .route("/reservations/", get(bookings::reservations))
        .nest("/api", api_routes())
}
