//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `listener.port`.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding `upstream.timeout_secs`.
pub const ENV_TIMEOUT: &str = "TIMEOUT";
/// Environment variable overriding `retries.max_retries`.
pub const ENV_RETRIES: &str = "RETRIES";
/// Environment variable overriding `access.secret`.
pub const ENV_KEY: &str = "KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for environment variable {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    load_config_with(path, |var| std::env::var(var).ok())
}

/// [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    let config = apply_env_overrides(config, lookup)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `PORT`, `TIMEOUT`, `RETRIES` and `KEY` overrides.
///
/// `lookup` abstracts the environment so callers can supply a fixed map.
/// An empty `KEY` clears the secret.
pub fn apply_env_overrides<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_PORT) {
        config.listener.port = parse_env(ENV_PORT, value)?;
    }
    if let Some(value) = lookup(ENV_TIMEOUT) {
        config.upstream.timeout_secs = parse_env(ENV_TIMEOUT, value)?;
    }
    if let Some(value) = lookup(ENV_RETRIES) {
        config.retries.max_retries = parse_env(ENV_RETRIES, value)?;
    }
    if let Some(value) = lookup(ENV_KEY) {
        config.access.secret = if value.is_empty() { None } else { Some(value) };
    }
    Ok(config)
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
