//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STORE_RATINGS_API_URL` - JSON API base URL (default: `http://localhost:3000/api`)
//! - `STORE_RATINGS_SESSION_FILE` - Where the session is kept between runs
//!   (default: `$HOME/.store-ratings/session.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default base URL of the JSON API.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

const SESSION_DIR: &str = ".store-ratings";
const SESSION_FILE: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub api_url: String,
    /// JSON file holding the session between runs
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = optional("STORE_RATINGS_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STORE_RATINGS_API_URL".to_string(), e.to_string())
        })?;

        let session_file = optional("STORE_RATINGS_SESSION_FILE").map_or_else(
            || {
                optional("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_default()
                    .join(SESSION_DIR)
                    .join(SESSION_FILE)
            },
            PathBuf::from,
        );

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            session_file,
        })
    }
}
