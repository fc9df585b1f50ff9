//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SIA_API_URL` - Base URL of the storefront REST API (e.g. `https://shop.example.com/api`)
//!
//! ## Optional
//! - `SIA_DATA_DIR` - Directory for the persisted cart and wishlist (default: `.sia`)
//! - `SIA_CATALOG_CACHE_TTL_SECS` - Catalog response cache lifetime (default: 300)
//! - `SIA_HTTP_TIMEOUT_SECS` - Per-request HTTP timeout (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g. production)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".sia";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST API connection settings
    pub api: ApiConfig,
    /// Directory holding durable storage (cart, wishlist) and session storage
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// REST API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it
    pub base_url: Url,
    /// How long catalog responses stay cached
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Settings for `base_url` with default cache lifetime and timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
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

        let base_url = parse_base_url("SIA_API_URL", &get_required_env("SIA_API_URL")?)?;
        let cache_ttl = get_secs_or_default("SIA_CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        let timeout = get_secs_or_default("SIA_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let data_dir = PathBuf::from(get_env_or_default("SIA_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            api: ApiConfig {
                base_url,
                cache_ttl,
                timeout,
            },
            data_dir,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Directory for durable storage (survives restarts).
    #[must_use]
    pub fn durable_dir(&self) -> PathBuf {
        self.data_dir.join("local")
    }

    /// Directory for short-lived session storage (express checkout).
    #[must_use]
    pub fn session_dir(&self) -> PathBuf {
        self.data_dir.join("session")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a whole number of seconds, falling back to `default`.
fn get_secs_or_default(key: &str, default: u64) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(Duration::from_secs(default)), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse the API base URL.
///
/// A trailing slash is added so that `Url::join` appends endpoint paths
/// instead of replacing the last segment.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("X", "https://shop.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api/");
        assert_eq!(
            url.join("products").unwrap().as_str(),
            "https://shop.example.com/api/products"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("X", "http://localhost:3000/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/");
    }

    #[test]
    fn test_parse_base_url_rejects_relative() {
        let err = parse_base_url("SIA_API_URL", "/api").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SIA_API_URL"));
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        assert!(parse_base_url("X", "mailto:shop@example.com").is_err());
        assert!(parse_base_url("X", "ftp://example.com/api").is_err());
    }

    #[test]
    fn test_storage_dirs_live_under_data_dir() {
        let config = StorefrontConfig {
            api: ApiConfig::new(Url::parse("http://localhost:3000/api/").unwrap()),
            data_dir: PathBuf::from("/tmp/sia"),
            sentry_dsn: None,
            sentry_environment: None,
        };
        assert_eq!(config.durable_dir(), PathBuf::from("/tmp/sia/local"));
        assert_eq!(config.session_dir(), PathBuf::from("/tmp/sia/session"));
    }

    #[test]
    fn test_api_config_defaults() {
        let api = ApiConfig::new(Url::parse("http://localhost:3000/api/").unwrap());
        assert_eq!(api.cache_ttl, Duration::from_secs(300));
        assert_eq!(api.timeout, Duration::from_secs(15));
    }
}
