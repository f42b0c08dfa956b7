//! services/booking_api/src/config.rs
//!
//! Defines the service configuration and its loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// How long the confirmation screen stays up before the session resets.
    pub confirmation_dwell: Duration,
    pub allowed_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Booking Settings ---
        let dwell_str = lookup("CONFIRMATION_DWELL_SECS").unwrap_or_else(|| "50".to_string());
        let dwell_secs = dwell_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "CONFIRMATION_DWELL_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", dwell_str),
                )
            })?;

        Ok(Self {
            bind_address,
            log_level,
            confirmation_dwell: Duration::from_secs(dwell_secs),
            allowed_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.confirmation_dwell, Duration::from_secs(50));
        assert_eq!(config.allowed_origin, "http://localhost:3000");
    }

    #[test]
    fn dwell_time_is_configurable() {
        let config = config_from(&[("CONFIRMATION_DWELL_SECS", "5")]).unwrap();
        assert_eq!(config.confirmation_dwell, Duration::from_secs(5));
    }

    #[test]
    fn rejects_zero_dwell_time() {
        let err = config_from(&[("CONFIRMATION_DWELL_SECS", "0")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue(var, _) if var == "CONFIRMATION_DWELL_SECS")
        );
    }

    #[test]
    fn rejects_bad_log_level() {
        let err = config_from(&[("RUST_LOG", "chatty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "RUST_LOG"));
    }
}
