// src/workload/mod.rs

//! Producers of task graphs.
//!
//! - [`fan`]: the generated fan-out / fan-in loop workload.
//! - [`declared`]: graphs listed task by task in the config file.

pub mod declared;
pub mod fan;

pub use declared::{build_declared, TaskSpec};
pub use fan::FanWorkload;
