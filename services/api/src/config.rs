//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_CARBON_API_URL: &str = "https://www.carboninterface.com/api/v1";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub cors_origin: String,
    pub carbon_api_url: String,
    pub carbon_api_key: Option<String>,
    pub carbon_api_timeout: Duration,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub summary_model: String,
    pub history_limit: usize,
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

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Load Server and Database Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Load Carbon Estimate API Settings ---
        let carbon_api_url = lookup("CARBON_API_URL")
            .unwrap_or_else(|| DEFAULT_CARBON_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let carbon_api_key = lookup("CARBON_API_KEY").filter(|k| !k.trim().is_empty());
        let carbon_api_timeout = Duration::from_secs(parse_number(
            &lookup,
            "CARBON_API_TIMEOUT_SECS",
            10,
        )?);

        // --- Load Summary LLM Settings ---
        let openai_api_key = lookup("OPENAI_API_KEY");
        let openai_base_url = lookup("OPENAI_BASE_URL");
        let summary_model =
            lookup("SUMMARY_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());

        let history_limit = parse_number(&lookup, "HISTORY_LIMIT", 5)?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            carbon_api_url,
            carbon_api_key,
            carbon_api_timeout,
            openai_api_key,
            openai_base_url,
            summary_model,
            history_limit,
        })
    }
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/eco")]))
                .unwrap();

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.carbon_api_url, DEFAULT_CARBON_API_URL);
        assert_eq!(config.carbon_api_key, None);
        assert_eq!(config.carbon_api_timeout, Duration::from_secs(10));
        assert_eq!(config.summary_model, "gpt-4o-mini");
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "DATABASE_URL"));
    }

    #[test]
    fn invalid_values_are_reported_by_name() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/eco"),
            ("HISTORY_LIMIT", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "HISTORY_LIMIT"));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/eco"),
            ("RUST_LOG", "chatty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "RUST_LOG"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/eco"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("CARBON_API_URL", "http://carbon.test/api/"),
            ("CARBON_API_KEY", "secret"),
            ("CARBON_API_TIMEOUT_SECS", "3"),
            ("SUMMARY_MODEL", "gpt-4o"),
            ("HISTORY_LIMIT", "10"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.carbon_api_url, "http://carbon.test/api");
        assert_eq!(config.carbon_api_key.as_deref(), Some("secret"));
        assert_eq!(config.carbon_api_timeout, Duration::from_secs(3));
        assert_eq!(config.summary_model, "gpt-4o");
        assert_eq!(config.history_limit, 10);
    }
}
