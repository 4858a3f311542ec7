// src/config/mod.rs

//! Configuration loading and validation for schedsim.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate cards, steal constants and the task graph (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, DEFAULT_CONFIG_FILE};
pub use model::{ConfigFile, RawConfigFile, SimSection};
pub use crate::engine::StealPolicy;
pub use crate::workload::{FanWorkload, TaskSpec};
