//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://little_lemon.db`)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//!   (default: `http://localhost:8001`)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 8001)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`,
//!   `SENTRY_TRACES_SAMPLE_RATE` - Error tracking
//! - `LOG_FORMAT` - `json` for structured logs

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;

pub use little_lemon_restaurant::config::ConfigError;
use little_lemon_restaurant::config::{
    LogFormat, SentryConfig, get_database_url, get_env_or_default,
};

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Error tracking
    pub sentry: SentryConfig,
    /// Log output format
    pub log_format: LogFormat,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "8001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = validate_base_url(&get_env_or_default(
            "ADMIN_BASE_URL",
            "http://localhost:8001",
        ))?;

        Ok(Self {
            database_url: get_database_url("ADMIN_DATABASE_URL"),
            host,
            port,
            base_url,
            sentry: SentryConfig::from_env()?,
            log_format: LogFormat::from_env(),
        })
    }

    /// Configuration for tests: in-memory database, plain HTTP.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            database_url: SecretString::from("sqlite::memory:"),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://localhost:8001".to_string(),
            sentry: SentryConfig::default(),
            log_format: LogFormat::Text,
        }
    }

    /// Whether the panel is served over HTTPS (decides the Secure cookie flag).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Strip a trailing slash and require an http(s) scheme.
fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "ADMIN_BASE_URL".to_string(),
            format!("{raw:?} must start with http:// or https://"),
        ))
    }
}
