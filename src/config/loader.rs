//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServiceConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Semantic checks; serde already guarantees the shape.
fn validate(config: &ServiceConfig) -> Result<(), ConfigError> {
    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        return Err(ConfigError::Invalid(format!(
            "listener.bind_address {:?} is not a socket address",
            config.listener.bind_address
        )));
    }
    let rate = config.injection.error_rate;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::Invalid(format!(
            "injection.error_rate {} must be within [0, 1]",
            rate
        )));
    }
    Ok(())
}
