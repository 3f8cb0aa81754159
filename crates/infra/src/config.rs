//! Environment-driven configuration.

use std::path::PathBuf;

use rocketcart_cart::CART_STORAGE_KEY;
use rocketcart_observability::LogFormat;

use crate::sqlite::default_database_path;

pub const ENV_API_URL: &str = "ROCKETCART_API_URL";
pub const ENV_DB_PATH: &str = "ROCKETCART_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "ROCKETCART_STORAGE_KEY";
pub const ENV_LOG_FORMAT: &str = "ROCKETCART_LOG_FORMAT";

/// Default storefront backend (the json-server the storefront ships with).
pub const DEFAULT_API_URL: &str = "http://localhost:3333";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is set but empty")]
    Empty { name: &'static str },
    #[error("{name} must be an http(s) URL, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("no database path configured and no default location available: {0}")]
    NoDatabasePath(String),
}

/// Runtime configuration of a cart client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub api_url: String,
    pub database_path: PathBuf,
    pub storage_key: String,
    pub log_format: LogFormat,
}

impl CartConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup` (variable name → value).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                None => Ok(None),
                Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { name }),
                Some(value) => Ok(Some(value.trim().to_string())),
            }
        };

        let api_url = var(ENV_API_URL)?.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_url(ENV_API_URL, &api_url)?;

        let database_path = match var(ENV_DB_PATH)? {
            Some(path) => PathBuf::from(path),
            None => default_database_path()
                .map_err(|e| ConfigError::NoDatabasePath(format!("{e:#}")))?,
        };

        let storage_key = var(ENV_STORAGE_KEY)?.unwrap_or_else(|| CART_STORAGE_KEY.to_string());

        let log_format = match var(ENV_LOG_FORMAT)? {
            Some(raw) => raw.parse::<LogFormat>().map_err(|reason| ConfigError::Invalid {
                name: ENV_LOG_FORMAT,
                reason,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_url,
            database_path,
            storage_key,
            log_format,
        })
    }

    /// Override the API URL (e.g. from a CLI flag).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self, ConfigError> {
        let api_url = api_url.into();
        validate_url(ENV_API_URL, &api_url)?;
        self.api_url = api_url;
        Ok(self)
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            name,
            value: value.to_string(),
        })
    }
}
