// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::cluster::Cluster;
use crate::dag::TaskGraph;
use crate::engine::{SimOptions, StealPolicy};
use crate::errors::Result;
use crate::workload::{build_declared, FanWorkload, TaskSpec};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [sim]
/// cards = [20, 20]
/// seed = 7
///
/// [steal]
/// p_max = 0.5
///
/// [task.start]
///
/// [task.a]
/// after = ["start"]
/// horizon = ["finish"]
///
/// [task.finish]
/// after = ["a"]
/// ```
///
/// All sections are optional. Without `[task.*]` entries the graph comes
/// from `[workload]` (or its defaults).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub sim: SimSection,

    #[serde(default)]
    pub steal: StealPolicy,

    #[serde(default)]
    pub workload: Option<FanWorkload>,

    /// Explicit tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskSpec>,
}

/// Validated configuration. Build one with `ConfigFile::try_from`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub sim: SimSection,
    pub steal: StealPolicy,
    pub workload: Option<FanWorkload>,
    pub task: BTreeMap<String, TaskSpec>,
}

/// `[sim]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SimSection {
    /// Worker slots per card; one entry per card.
    #[serde(default = "default_cards")]
    pub cards: Vec<u32>,

    #[serde(default)]
    pub seed: u64,

    /// Ticks charged per dependency edge that crosses cards.
    #[serde(default = "default_transfer_latency")]
    pub transfer_latency: u32,

    /// Root task name for `[task.*]` graphs.
    #[serde(default)]
    pub root: Option<String>,
}

fn default_cards() -> Vec<u32> {
    vec![20; 4]
}

fn default_transfer_latency() -> u32 {
    1
}

impl Default for SimSection {
    fn default() -> Self {
        Self {
            cards: default_cards(),
            seed: 0,
            transfer_latency: default_transfer_latency(),
            root: None,
        }
    }
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            sim: raw.sim,
            steal: raw.steal,
            workload: raw.workload,
            task: raw.task,
        }
    }

    /// The generator used when no explicit tasks are configured.
    pub fn effective_workload(&self) -> Option<FanWorkload> {
        if self.task.is_empty() {
            Some(self.workload.unwrap_or_default())
        } else {
            None
        }
    }

    pub fn build_graph(&self) -> Result<TaskGraph> {
        match self.effective_workload() {
            Some(fan) => Ok(fan.build()),
            None => build_declared(&self.task, self.sim.root.as_deref()),
        }
    }

    pub fn build_cluster(&self) -> Result<Cluster> {
        Cluster::new(self.sim.cards.iter().map(|&w| w as usize))
    }

    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            seed: self.sim.seed,
            transfer_latency: self.sim.transfer_latency,
            steal: self.steal,
        }
    }
}

impl Default for ConfigFile {
    /// The built-in fan workload on four 20-worker cards.
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}
