//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied between parsing and validation.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ServiceConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    finalize(config)
}

/// Build a validated configuration from defaults plus the environment.
pub fn default_config() -> Result<ServiceConfig, ConfigError> {
    finalize(ServiceConfig::default())
}

fn finalize(mut config: ServiceConfig) -> Result<ServiceConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `RATE_LIMIT`, `LOG_LEVEL`, `DATABASE_PATH` and `BIND_ADDRESS`
/// overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("RATE_LIMIT") {
        match raw.trim().parse::<u32>() {
            Ok(limit) => config.rate_limit.requests_per_window = limit,
            Err(_) => tracing::warn!(value = %raw, "Ignoring unparseable RATE_LIMIT override"),
        }
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level.trim().to_ascii_lowercase();
    }
    if let Some(path) = lookup("DATABASE_PATH") {
        config.database.path = path;
    }
    if let Some(addr) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
}
