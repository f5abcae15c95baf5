//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `PIZZA_CART_MENU_UPDATE_SECS` - Seconds a cached menu stays fresh (default: 43200, 12 hours)
//! - `PIZZA_CART_SERVICE` - Service method used when the user has not picked one (`delivery` or `carryout`)
//! - `PIZZA_CART_STORE_BUFFER` - Channel capacity of the key-value actor (default: 32)

use crate::model::ServiceMethod;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const MENU_UPDATE_ENV: &str = "PIZZA_CART_MENU_UPDATE_SECS";
pub const SERVICE_ENV: &str = "PIZZA_CART_SERVICE";
pub const STORE_BUFFER_ENV: &str = "PIZZA_CART_STORE_BUFFER";

const DEFAULT_MENU_UPDATE_SECS: u64 = 12 * 60 * 60;
const DEFAULT_STORE_BUFFER: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Menu update time out of range: {0:?}")]
    UpdateTimeOutOfRange(Duration),
}

/// Cart runtime configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// How long a fetched menu is reused before it is fetched again
    pub menu_update_time: Duration,
    /// Service method for users who have not chosen one
    pub default_service: Option<ServiceMethod>,
    /// Capacity of the key-value actor's request channel
    pub store_buffer: usize,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            menu_update_time: Duration::from_secs(DEFAULT_MENU_UPDATE_SECS),
            default_service: None,
            store_buffer: DEFAULT_STORE_BUFFER,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CartConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MENU_UPDATE_ENV) {
            let secs = parse_var::<u64>(MENU_UPDATE_ENV, &raw)?;
            config.menu_update_time = Duration::from_secs(secs);
            config.update_window()?;
        }
        if let Some(raw) = lookup(SERVICE_ENV) {
            let method = raw
                .trim()
                .parse::<ServiceMethod>()
                .map_err(|e| ConfigError::InvalidEnvVar(SERVICE_ENV.to_string(), e.to_string()))?;
            config.default_service = Some(method);
        }
        if let Some(raw) = lookup(STORE_BUFFER_ENV) {
            let buffer = parse_var::<usize>(STORE_BUFFER_ENV, &raw)?;
            if buffer == 0 {
                return Err(ConfigError::InvalidEnvVar(
                    STORE_BUFFER_ENV.to_string(),
                    "must be at least 1".to_string(),
                ));
            }
            config.store_buffer = buffer;
        }

        Ok(config)
    }

    /// The menu freshness window as a `chrono` duration.
    pub fn update_window(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::from_std(self.menu_update_time)
            .map_err(|_| ConfigError::UpdateTimeOutOfRange(self.menu_update_time))
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
