// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::MAX_TRANSFER_LATENCY;
use crate::errors::{Result, SchedsimError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SchedsimError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Semantic checks on a parsed config, in this order:
/// - the cards (at least one, none without workers) and transfer latency
/// - the steal curve constants
/// - the generator dimensions, and that `[workload]` and `[task.*]` are not
///   mixed
/// - that every `after`, `horizon` and `root` name refers to a task
/// - that the graph has no cycles and exactly one task is a root
pub fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_sim_section(cfg)?;
    validate_steal_policy(cfg)?;
    validate_workload(cfg)?;
    validate_task_references(cfg)?;
    validate_dag(cfg)?;
    validate_root(cfg)?;
    Ok(())
}

fn validate_sim_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.sim.cards.is_empty() {
        return Err(SchedsimError::ConfigError(
            "[sim].cards must list at least one card".to_string(),
        ));
    }
    if let Some(idx) = cfg.sim.cards.iter().position(|&w| w == 0) {
        return Err(SchedsimError::ConfigError(format!(
            "[sim].cards[{idx}] must have at least one worker (got 0)"
        )));
    }
    let latency = cfg.sim.transfer_latency;
    if !(1..=MAX_TRANSFER_LATENCY).contains(&latency) {
        return Err(SchedsimError::ConfigError(format!(
            "[sim].transfer_latency must be between 1 and {MAX_TRANSFER_LATENCY} (got {latency})"
        )));
    }
    Ok(())
}

fn validate_steal_policy(cfg: &RawConfigFile) -> Result<()> {
    let steal = &cfg.steal;
    let in_unit = |p: f64| (0.0..=1.0).contains(&p);

    if !in_unit(steal.p_min) || !in_unit(steal.p_max) || steal.p_min > steal.p_max {
        return Err(SchedsimError::ConfigError(format!(
            "[steal] needs 0 <= p_min <= p_max <= 1 (got p_min = {}, p_max = {})",
            steal.p_min, steal.p_max
        )));
    }
    if steal.dist_max.is_nan() || steal.dist_max <= 0.0 {
        return Err(SchedsimError::ConfigError(format!(
            "[steal].dist_max must be > 0 (got {})",
            steal.dist_max
        )));
    }
    Ok(())
}

fn validate_workload(cfg: &RawConfigFile) -> Result<()> {
    let Some(fan) = cfg.workload else {
        return Ok(());
    };

    if !cfg.task.is_empty() {
        return Err(SchedsimError::ConfigError(
            "[workload] and [task.<name>] sections cannot be combined".to_string(),
        ));
    }

    let dims = [
        ("loops", fan.loops),
        ("iterations", fan.iterations),
        ("fanout", fan.fanout),
        ("branch_len", fan.branch_len),
    ];
    for (name, value) in dims {
        if value == 0 {
            return Err(SchedsimError::ConfigError(format!(
                "[workload].{name} must be >= 1 (got 0)"
            )));
        }
    }
    Ok(())
}

fn validate_task_references(cfg: &RawConfigFile) -> Result<()> {
    let known = |name: &str| cfg.task.contains_key(name);

    for (name, task) in &cfg.task {
        if let Some(dep) = task.after.iter().find(|dep| !known(dep)) {
            return Err(SchedsimError::ConfigError(format!(
                "task '{name}' has unknown dependency '{dep}' in `after`"
            )));
        }
        if task.after.contains(name) {
            return Err(SchedsimError::ConfigError(format!(
                "task '{name}' lists itself in `after`"
            )));
        }
        if let Some(h) = task.horizon.iter().find(|h| !known(h)) {
            return Err(SchedsimError::ConfigError(format!(
                "task '{name}' has unknown task '{h}' in `horizon`"
            )));
        }
    }
    Ok(())
}

fn validate_root(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        if cfg.sim.root.is_some() {
            return Err(SchedsimError::ConfigError(
                "[sim].root only applies to [task.<name>] graphs".to_string(),
            ));
        }
        return Ok(());
    }

    let roots: Vec<&str> = cfg
        .task
        .iter()
        .filter(|(_, task)| task.after.is_empty())
        .map(|(name, _)| name.as_str())
        .collect();

    if let Some(root) = cfg.sim.root.as_deref() {
        if !cfg.task.contains_key(root) {
            return Err(SchedsimError::ConfigError(format!(
                "[sim].root names unknown task '{root}'"
            )));
        }
        if !roots.contains(&root) {
            return Err(SchedsimError::GraphIntegrity(format!(
                "root '{root}' must not have dependencies"
            )));
        }
    }

    match roots.as_slice() {
        [_] => Ok(()),
        [] => Err(SchedsimError::GraphIntegrity(
            "no task without dependencies; the graph needs exactly one root".to_string(),
        )),
        many => Err(SchedsimError::GraphIntegrity(format!(
            "tasks {:?} have no dependencies; the graph needs exactly one root",
            many
        ))),
    }
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // `after = ["a"]` on task `b` is the edge a -> b.
    let edges = cfg.task.iter().flat_map(|(name, task)| {
        task.after
            .iter()
            .map(move |dep| (dep.as_str(), name.as_str()))
    });
    let mut deps: DiGraphMap<&str, ()> = DiGraphMap::from_edges(edges);
    for name in cfg.task.keys() {
        deps.add_node(name.as_str());
    }

    toposort(&deps, None).map(|_| ()).map_err(|cycle| {
        SchedsimError::GraphIntegrity(format!(
            "cycle detected in task graph involving task '{}'",
            cycle.node_id()
        ))
    })
}
