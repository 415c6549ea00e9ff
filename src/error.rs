//! Error types for the Eventcalc application

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for '{key}': {message}")]
    Invalid { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
