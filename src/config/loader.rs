//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{FlatJsonConfig, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Config file names probed when a directory is given, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["config.toml", "config.json"];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

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

/// Resolve a `--config` argument to a config file.
///
/// A directory is searched for [`CONFIG_FILE_NAMES`]; a file is used as-is.
pub fn locate_config(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_dir() {
        return CONFIG_FILE_NAMES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ConfigError::NotFound(path.join(CONFIG_FILE_NAMES[0])));
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    Err(ConfigError::NotFound(path.to_path_buf()))
}

/// Load and validate configuration from a TOML or JSON file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content, is_json(path))?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_config(content: &str, json: bool) -> Result<GatewayConfig, ConfigError> {
    if json {
        let flat: FlatJsonConfig = serde_json::from_str(content)?;
        Ok(flat.into())
    } else {
        Ok(toml::from_str(content)?)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
