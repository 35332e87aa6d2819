//! Basket configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_BASE_URL` - Root URL of the product/stock service
//!
//! ## Optional
//! - `CATALOG_ACCESS_TOKEN` - Bearer token for the catalog service
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `BASKET_SNAPSHOT_DIR` - Directory for cart snapshots (default: ./data)

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_SNAPSHOT_DIR: &str = "./data";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Basket application configuration.
#[derive(Debug, Clone)]
pub struct BasketConfig {
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Directory holding the persisted cart snapshot
    pub snapshot_dir: PathBuf,
}

/// Catalog service configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Root URL of the catalog service, without a trailing slash
    pub base_url: String,
    /// Bearer token sent on every catalog request, if the service needs one
    pub access_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BasketConfig {
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

        let catalog = CatalogConfig::from_env()?;
        let snapshot_dir =
            PathBuf::from(get_env_or_default("BASKET_SNAPSHOT_DIR", DEFAULT_SNAPSHOT_DIR));

        Ok(Self {
            catalog,
            snapshot_dir,
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(&get_required_env("CATALOG_BASE_URL")?);
        let access_token = get_optional_env("CATALOG_ACCESS_TOKEN").map(SecretString::from);
        let timeout_secs = get_env_or_default("CATALOG_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            access_token,
            timeout: Duration::from_secs(timeout_secs),
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

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Strip any trailing slashes so request paths can be joined with `/`.
fn normalize_base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}
