//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HostConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the endpoint bind hints. Semicolon
/// separated; overrides any hint list in the config file.
pub const ENDPOINT_URLS_ENV: &str = "BACKEND_ENDPOINT_URLS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but failed semantic checks.
    #[error("validation failed: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then overlay the
/// environment-supplied endpoint hints.
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: HostConfig = toml::from_str(&content)?;

    apply_env_overlay(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay `BACKEND_ENDPOINT_URLS` onto the config. The environment wins
/// over the file; it is read exactly once, at load time.
pub fn apply_env_overlay(config: &mut HostConfig) {
    if let Ok(raw) = std::env::var(ENDPOINT_URLS_ENV) {
        config.endpoint.urls = Some(split_endpoint_urls(&raw));
    }
}

fn split_endpoint_urls(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
