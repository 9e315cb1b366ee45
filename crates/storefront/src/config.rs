//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_BASE_PATH` - Path prefix every route is served under (default: /)
//! - `STOREFRONT_STATIC_DIR` - Directory served at `{base}/static` (default: crates/storefront/static)
//! - `STOREFRONT_ORDER_DELAY_MS` - Simulated order submission time (default: 2000)
//! - `STOREFRONT_SIGNUP_DELAY_MS` - Simulated registration time (default: 2000)
//! - `STOREFRONT_SIGNIN_DELAY_MS` - Simulated sign-in time (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use devico_core::BasePath;
use thiserror::Error;
use url::Url;

const DEFAULT_DELAY_MS: u64 = 2000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Path prefix for every route
    pub base_path: BasePath,
    /// Static asset directory
    pub static_dir: PathBuf,
    /// Simulated order submission time
    pub order_delay: Duration,
    /// Simulated registration time
    pub signup_delay: Duration,
    /// Simulated sign-in time
    pub signin_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            base_path: BasePath::default(),
            static_dir: PathBuf::from("crates/storefront/static"),
            order_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            signup_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            signin_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
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
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = parse_var("STOREFRONT_HOST", &var("STOREFRONT_HOST", "127.0.0.1"))?;
        let port = parse_var("STOREFRONT_PORT", &var("STOREFRONT_PORT", "3000"))?;

        let base_url = var("STOREFRONT_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let base_path = var("STOREFRONT_BASE_PATH", "/");
        if !base_path.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_BASE_PATH".to_string(),
                "must start with '/'".to_string(),
            ));
        }

        let delay = |key: &str| -> Result<Duration, ConfigError> {
            let ms: u64 = parse_var(key, &var(key, &DEFAULT_DELAY_MS.to_string()))?;
            Ok(Duration::from_millis(ms))
        };

        Ok(Self {
            host,
            port,
            base_url,
            base_path: BasePath::new(&base_path),
            static_dir: lookup("STOREFRONT_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            order_delay: delay("STOREFRONT_ORDER_DELAY_MS")?,
            signup_delay: delay("STOREFRONT_SIGNUP_DELAY_MS")?,
            signin_delay: delay("STOREFRONT_SIGNIN_DELAY_MS")?,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: lookup("SENTRY_SAMPLE_RATE")
                .map(|v| parse_var("SENTRY_SAMPLE_RATE", &v))
                .transpose()?
                .unwrap_or(defaults.sentry_sample_rate),
            sentry_traces_sample_rate: lookup("SENTRY_TRACES_SAMPLE_RATE")
                .map(|v| parse_var("SENTRY_TRACES_SAMPLE_RATE", &v))
                .transpose()?
                .unwrap_or(defaults.sentry_traces_sample_rate),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an environment value, naming the variable on failure.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
