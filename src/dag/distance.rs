// src/dag/distance.rs

//! Incremental longest-path distances from a task to its horizon tasks.
//!
//! Each task's map is derived once, when the task becomes eligible, from the
//! maps its predecessors already hold. Nothing is ever recomputed, so the
//! whole graph is covered in a single forward sweep that follows execution.

use std::collections::BTreeMap;

use tracing::{trace, warn};

use crate::dag::graph::{Task, TaskGraph};
use crate::types::TaskId;

/// `min_distance` of a task whose own horizon set is empty.
///
/// Far beyond any steal-heuristic `dist_max`, so such a task counts as not
/// critical.
pub const UNREACHED_DISTANCE: u32 = 1000;

/// Horizon task -> longest-path distance, plus the minimum over the task's
/// own horizon set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    by_horizon: BTreeMap<TaskId, u32>,
    min_distance: u32,
}

impl DistanceMap {
    /// Distance to `horizon`, if this task can reach it.
    pub fn get(&self, horizon: TaskId) -> Option<u32> {
        self.by_horizon.get(&horizon).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskId, u32)> + '_ {
        self.by_horizon.iter().map(|(h, d)| (*h, *d))
    }

    pub fn horizons(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.by_horizon.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_horizon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_horizon.is_empty()
    }

    pub fn min_distance(&self) -> u32 {
        self.min_distance
    }
}

/// Compute and store the distance map of `task`.
///
/// Must run when the task becomes eligible, i.e. after every predecessor
/// holds its own map. A second call for the same task in one run is ignored.
pub fn compute_distances(graph: &mut TaskGraph, task: TaskId) {
    if graph.task(task).distances().is_some() {
        warn!(
            task = %graph.task(task).label(),
            "distances already computed for this run; keeping the first result"
        );
        return;
    }

    let map = derive(graph, graph.task(task));
    trace!(
        task = %graph.task(task).label(),
        horizons = map.len(),
        min_distance = map.min_distance,
        "distances computed"
    );
    graph.set_distances(task, map);
}

fn derive(graph: &TaskGraph, task: &Task) -> DistanceMap {
    let mut by_horizon = BTreeMap::new();
    let mut min_distance = UNREACHED_DISTANCE;

    for &horizon in task.horizon() {
        let dist = longest_via_predecessors(graph, task, horizon);
        by_horizon.insert(horizon, dist);
        min_distance = min_distance.min(dist);
    }

    // Horizons known upstream flow forward even when they are not in this
    // task's own set; they do not affect `min_distance`.
    for &pred in task.predecessors() {
        let Some(pred_map) = graph.task(pred).distances() else {
            continue;
        };
        for horizon in pred_map.horizons() {
            by_horizon.insert(horizon, longest_via_predecessors(graph, task, horizon));
        }
    }

    DistanceMap {
        by_horizon,
        min_distance,
    }
}

/// `1 + max` recorded predecessor distance to `horizon`, or 0 when no
/// predecessor has one.
fn longest_via_predecessors(graph: &TaskGraph, task: &Task, horizon: TaskId) -> u32 {
    task.predecessors()
        .iter()
        .filter_map(|&p| graph.task(p).distances().and_then(|m| m.get(horizon)))
        .max()
        .map_or(0, |d| d + 1)
}
