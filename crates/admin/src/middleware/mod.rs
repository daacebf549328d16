//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `SQLite` store)
//! 5. Security headers (no framing, no caching)
//!
//! Authentication is enforced per handler by the [`RequireStaff`] extractor.

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalStaff, RequireStaff, clear_current_staff, set_current_staff, set_flash, take_flash,
};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, create_session_store};
