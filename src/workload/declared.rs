// src/workload/declared.rs

//! Task graphs spelled out task by task in the config file.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::dag::TaskGraph;
use crate::errors::{Result, SchedsimError};
use crate::types::{StealClass, TaskId};

/// `[task.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskSpec {
    /// Tasks this one depends on, in edge-insertion order.
    ///
    /// The order matters: it decides ties when voting for the owning card.
    #[serde(default)]
    pub after: Vec<String>,

    /// Horizon set used for the task's criticality distance.
    #[serde(default)]
    pub horizon: Vec<String>,

    /// Count steals of this task as unhealthy.
    #[serde(default)]
    pub unhealthy: bool,
}

/// Build a graph from named task specs.
///
/// Tasks are created in name order; edges follow each task's `after` list.
/// `root` names the root task; without it the single task with no `after`
/// entries is used.
pub fn build_declared(tasks: &BTreeMap<String, TaskSpec>, root: Option<&str>) -> Result<TaskGraph> {
    let mut graph = TaskGraph::new();
    let mut ids: HashMap<&str, TaskId> = HashMap::new();

    for name in tasks.keys() {
        ids.insert(name.as_str(), graph.add_task(name.as_str()));
    }

    let lookup = |name: &str| -> Result<TaskId> {
        ids.get(name)
            .copied()
            .ok_or_else(|| SchedsimError::UnknownTask(name.to_string()))
    };

    for (name, spec) in tasks {
        let id = lookup(name)?;
        for dep in &spec.after {
            graph.add_dependency(lookup(dep)?, id);
        }

        let horizon = spec
            .horizon
            .iter()
            .map(|h| lookup(h))
            .collect::<Result<Vec<_>>>()?;
        graph.set_horizon(id, horizon);

        if spec.unhealthy {
            graph.set_steal_class(id, StealClass::Unhealthy);
        }
    }

    let root = match root {
        Some(name) => lookup(name)?,
        None => infer_root(tasks, &lookup)?,
    };
    graph.set_root(root);

    Ok(graph)
}

fn infer_root(
    tasks: &BTreeMap<String, TaskSpec>,
    lookup: &impl Fn(&str) -> Result<TaskId>,
) -> Result<TaskId> {
    let mut roots = tasks.iter().filter(|(_, spec)| spec.after.is_empty());

    match (roots.next(), roots.next()) {
        (Some((name, _)), None) => lookup(name),
        (None, _) => Err(SchedsimError::GraphIntegrity(
            "no task without dependencies; cannot pick a root".to_string(),
        )),
        (Some((first, _)), Some((second, _))) => Err(SchedsimError::GraphIntegrity(format!(
            "tasks '{first}' and '{second}' both have no dependencies; exactly one root is allowed"
        ))),
    }
}
