//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BACKEND_URL` - Base URL of the marketplace REST backend
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_ENV` - `development` or `production` (default: production)
//! - `STOREFRONT_STATIC_DIR` - Prebuilt frontend bundle served for unmatched routes
//! - `STOREFRONT_PROTECTED_PATHS` - Comma list of prefixes requiring a session
//!   (default: /profile,/complete-profile)
//! - `STOREFRONT_AUTH_ONLY_PATHS` - Comma list of prefixes for signed-out users
//!   (default: /login)
//! - `STOREFRONT_LOGIN_PATH` - Redirect target for signed-out users (default: /login)
//! - `STOREFRONT_LANDING_PATH` - Redirect target for signed-in users (default: /)
//! - `STOREFRONT_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use componentry_core::RoutePrefix;
use thiserror::Error;
use url::Url;

const DEFAULT_PROTECTED_PATHS: &str = "/profile,/complete-profile";
const DEFAULT_AUTH_ONLY_PATHS: &str = "/login";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment.
///
/// Cookies are only marked `Secure` outside local development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Marketplace backend base URL
    pub backend_url: Url,
    /// Directory holding the prebuilt frontend bundle
    pub static_dir: Option<PathBuf>,
    /// Edge gate route configuration
    pub gate: GateConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Route sets the edge gate classifies request paths against.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Prefixes that require an access cookie.
    pub protected: Vec<RoutePrefix>,
    /// Prefixes only meaningful to signed-out visitors.
    pub auth_only: Vec<RoutePrefix>,
    /// Where signed-out visitors are sent.
    pub login_path: String,
    /// Where signed-in visitors are sent.
    pub landing_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected: RoutePrefix::parse_list(DEFAULT_PROTECTED_PATHS).unwrap_or_default(),
            auth_only: RoutePrefix::parse_list(DEFAULT_AUTH_ONLY_PATHS).unwrap_or_default(),
            login_path: "/login".to_string(),
            landing_path: "/".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let environment = get_env_or_default("STOREFRONT_ENV", "production");
        let environment = Environment::parse(&environment).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "STOREFRONT_ENV".to_string(),
                format!("expected 'development' or 'production', got '{environment}'"),
            )
        })?;
        let backend_url = parse_backend_url(&get_required_env("STOREFRONT_BACKEND_URL")?)?;
        let static_dir = get_optional_env("STOREFRONT_STATIC_DIR").map(PathBuf::from);
        let gate = GateConfig::from_env()?;
        let log_format = match get_optional_env("STOREFRONT_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "STOREFRONT_LOG_FORMAT".to_string(),
                    format!("expected 'pretty' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            host,
            port,
            environment,
            backend_url,
            static_dir,
            gate,
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Build a configuration for the given backend with all defaults applied.
    ///
    /// Used by tests and tools that construct the app without environment
    /// variables.
    #[must_use]
    pub fn for_backend(backend_url: Url) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            environment: Environment::Production,
            backend_url,
            static_dir: None,
            gate: GateConfig::default(),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies carry the `Secure` attribute.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.environment != Environment::Development
    }
}

impl GateConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            protected: get_prefix_list("STOREFRONT_PROTECTED_PATHS", DEFAULT_PROTECTED_PATHS)?,
            auth_only: get_prefix_list("STOREFRONT_AUTH_ONLY_PATHS", DEFAULT_AUTH_ONLY_PATHS)?,
            login_path: get_path("STOREFRONT_LOGIN_PATH", "/login")?,
            landing_path: get_path("STOREFRONT_LANDING_PATH", "/")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn get_prefix_list(key: &str, default: &str) -> Result<Vec<RoutePrefix>, ConfigError> {
    RoutePrefix::parse_list(&get_env_or_default(key, default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Redirect targets are kept verbatim but must be site-relative.
fn get_path(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = get_env_or_default(key, default);
    validate_redirect_path(&value)
        .map_err(|reason| ConfigError::InvalidEnvVar(key.to_string(), reason))?;
    Ok(value)
}

fn validate_redirect_path(value: &str) -> Result<(), String> {
    if !value.starts_with('/') {
        return Err(format!("must start with '/' (got '{value}')"));
    }
    // "//host" would redirect off-site
    if value.starts_with("//") {
        return Err(format!("must not be protocol-relative (got '{value}')"));
    }
    Ok(())
}

fn parse_backend_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("STOREFRONT_BACKEND_URL".into(), reason);

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("must be a base URL".to_string()));
    }
    Ok(url)
}
