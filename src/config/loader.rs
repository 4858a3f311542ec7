// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Schedsim.toml";

/// Read and parse a config file. Missing sections take their defaults; no
/// semantic checks run here.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let raw = toml::from_str(&text)?;
    debug!(path = %path.display(), "config parsed");
    Ok(raw)
}

/// [`load_from_path`] followed by [`ConfigFile::try_from`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_path(path)?)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
