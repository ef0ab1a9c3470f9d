//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional and fall back to local-development defaults.
//!
//! - `PEPPERLEAF_API_URL` - Base URL of the remote API, including the
//!   `/api` prefix (default: `http://localhost:5000/api`)
//! - `PEPPERLEAF_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)
//! - `PEPPERLEAF_DATA_DIR` - Directory for persisted session credentials
//!   (default: `.pepperleaf` in the working directory)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_DATA_DIR: &str = ".pepperleaf";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote API, including the `/api` prefix.
    pub api_base_url: Url,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Directory holding persisted session credentials.
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("PEPPERLEAF_API_URL", DEFAULT_API_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PEPPERLEAF_API_URL".to_string(), e.to_string())
            })?;

        let request_timeout = Duration::from_secs(
            get_env_or_default("PEPPERLEAF_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
                .parse::<u64>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "PEPPERLEAF_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })?,
        );

        let data_dir =
            PathBuf::from(get_env_or_default("PEPPERLEAF_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            api_base_url,
            request_timeout,
            data_dir,
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
