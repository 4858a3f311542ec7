// src/errors.rs

//! Error type shared by the library. The binary wraps it in `anyhow`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedsimError {
    /// A config value or engine parameter is out of range.
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A task name that no task carries.
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    /// The task graph breaks the single-root DAG contract.
    #[error("task graph rejected: {0}")]
    GraphIntegrity(String),

    #[error("could not parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SchedsimError>;
