// src/dag/graph.rs

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::warn;

use crate::dag::distance::DistanceMap;
use crate::errors::{Result, SchedsimError};
use crate::types::{CardIndex, StealClass, TaskId, WorkerIndex};

/// A node of the task graph.
///
/// The structural part (label, edges, horizon set, steal class) is written by
/// the graph builder before a run. The run-local part (satisfied count,
/// distances, placement) is owned by the simulation and cleared on every
/// reset.
#[derive(Debug, Clone)]
pub struct Task {
    label: String,
    predecessors: Vec<TaskId>,
    successors: Vec<TaskId>,
    /// Sinks against which this task's criticality is measured.
    horizon: Vec<TaskId>,
    steal_class: StealClass,

    satisfied: usize,
    distances: Option<DistanceMap>,
    card: Option<CardIndex>,
    worker: Option<WorkerIndex>,
}

impl Task {
    fn new(label: String) -> Self {
        Self {
            label,
            predecessors: Vec::new(),
            successors: Vec::new(),
            horizon: Vec::new(),
            steal_class: StealClass::Healthy,
            satisfied: 0,
            distances: None,
            card: None,
            worker: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Direct dependencies, in edge-insertion order.
    pub fn predecessors(&self) -> &[TaskId] {
        &self.predecessors
    }

    /// Direct dependents, in edge-insertion order.
    pub fn successors(&self) -> &[TaskId] {
        &self.successors
    }

    pub fn horizon(&self) -> &[TaskId] {
        &self.horizon
    }

    pub fn steal_class(&self) -> StealClass {
        self.steal_class
    }

    /// Number of predecessors that have executed in the current run.
    pub fn satisfied(&self) -> usize {
        self.satisfied
    }

    /// True iff every predecessor has executed in the current run.
    pub fn is_eligible(&self) -> bool {
        self.satisfied == self.predecessors.len()
    }

    /// Distance map, present once the task has become eligible in this run.
    pub fn distances(&self) -> Option<&DistanceMap> {
        self.distances.as_ref()
    }

    /// Minimum distance to the task's own horizon set, if computed.
    pub fn min_distance(&self) -> Option<u32> {
        self.distances.as_ref().map(DistanceMap::min_distance)
    }

    /// Card that ran (or is receiving) this task in the current run.
    pub fn card(&self) -> Option<CardIndex> {
        self.card
    }

    /// Worker slot that ran this task in the current run.
    pub fn worker(&self) -> Option<WorkerIndex> {
        self.worker
    }

    fn clear_run_state(&mut self) {
        self.satisfied = 0;
        self.distances = None;
        self.card = None;
        self.worker = None;
    }
}

/// Arena of tasks with index-based predecessor/successor edges.
///
/// Acyclicity is the builder's responsibility; [`TaskGraph::validate`]
/// checks it (and the single-root contract) before a simulation takes
/// ownership of the graph.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    root: Option<TaskId>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task with no edges and return its handle.
    pub fn add_task(&mut self, label: impl Into<String>) -> TaskId {
        let id = TaskId(self.tasks.len());
        self.tasks.push(Task::new(label.into()));
        id
    }

    /// Register `to` as depending on `from`.
    ///
    /// Appends `from` to `to`'s predecessors and `to` to `from`'s successors.
    /// There is no cycle detection here.
    pub fn add_dependency(&mut self, from: TaskId, to: TaskId) {
        self.tasks[to.0].predecessors.push(from);
        self.tasks[from.0].successors.push(to);
    }

    /// Replace the horizon set of `task`.
    pub fn set_horizon(&mut self, task: TaskId, horizon: impl IntoIterator<Item = TaskId>) {
        self.tasks[task.0].horizon = horizon.into_iter().collect();
    }

    pub fn set_steal_class(&mut self, task: TaskId, class: StealClass) {
        self.tasks[task.0].steal_class = class;
    }

    /// Designate the task the simulation is seeded with.
    pub fn set_root(&mut self, root: TaskId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<TaskId> {
        self.root
    }

    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.0)
    }

    /// First task carrying `label`, in insertion order.
    pub fn find(&self, label: &str) -> Option<TaskId> {
        self.tasks
            .iter()
            .position(|t| t.label == label)
            .map(TaskId)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All task handles in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        (0..self.tasks.len()).map(TaskId)
    }

    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter().enumerate().map(|(i, t)| (TaskId(i), t))
    }

    /// Record that `task` has executed: bump the satisfied count of every
    /// successor and return those that just became eligible.
    ///
    /// Distances of the returned tasks are not computed here.
    pub fn mark_satisfied(&mut self, task: TaskId) -> Vec<TaskId> {
        let mut newly_eligible = Vec::new();

        for i in 0..self.tasks[task.0].successors.len() {
            let succ = self.tasks[task.0].successors[i];
            let info = &mut self.tasks[succ.0];

            if info.satisfied >= info.predecessors.len() {
                warn!(
                    task = %info.label,
                    "successor already has every dependency satisfied; ignoring"
                );
                continue;
            }

            info.satisfied += 1;
            if info.is_eligible() {
                newly_eligible.push(succ);
            }
        }

        newly_eligible
    }

    pub(crate) fn set_distances(&mut self, task: TaskId, distances: DistanceMap) {
        self.tasks[task.0].distances = Some(distances);
    }

    /// Record where `task` runs (or is being moved to, with no worker yet).
    ///
    /// Written by the simulation; a reset clears it again.
    pub fn set_placement(&mut self, task: TaskId, card: CardIndex, worker: Option<WorkerIndex>) {
        let info = &mut self.tasks[task.0];
        info.card = Some(card);
        info.worker = worker;
    }

    /// Forget everything a previous run wrote into the tasks.
    pub(crate) fn clear_run_state(&mut self) {
        for task in &mut self.tasks {
            task.clear_run_state();
        }
    }

    /// Check the producer contract and return the root.
    ///
    /// This checks:
    /// - the graph is non-empty and has a designated root
    /// - the root is the one and only task without predecessors
    /// - every edge and horizon reference points into this arena
    /// - the graph has no cycles
    pub fn validate(&self) -> Result<TaskId> {
        let root = self.root.ok_or_else(|| {
            SchedsimError::GraphIntegrity("task graph has no designated root".to_string())
        })?;
        if root.0 >= self.tasks.len() {
            return Err(SchedsimError::GraphIntegrity(format!(
                "root {root} is not part of the task graph"
            )));
        }

        for (id, task) in self.tasks() {
            let dangling = task
                .predecessors
                .iter()
                .chain(task.successors.iter())
                .chain(task.horizon.iter())
                .find(|r| r.0 >= self.tasks.len());
            if let Some(r) = dangling {
                return Err(SchedsimError::GraphIntegrity(format!(
                    "task '{}' references {r}, which is not part of the task graph",
                    task.label
                )));
            }

            if task.predecessors.is_empty() && id != root {
                return Err(SchedsimError::GraphIntegrity(format!(
                    "task '{}' has no dependencies but is not the root '{}'",
                    task.label, self.tasks[root.0].label
                )));
            }
        }

        if !self.tasks[root.0].predecessors.is_empty() {
            return Err(SchedsimError::GraphIntegrity(format!(
                "root '{}' must not have dependencies",
                self.tasks[root.0].label
            )));
        }

        self.ensure_acyclic()?;
        Ok(root)
    }

    fn ensure_acyclic(&self) -> Result<()> {
        // Edge direction: dependency -> dependent.
        let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(self.tasks.len(), 0);
        for _ in &self.tasks {
            graph.add_node(());
        }
        for (id, task) in self.tasks() {
            for succ in &task.successors {
                graph.add_edge(NodeIndex::new(id.0), NodeIndex::new(succ.0), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => {
                let node = cycle.node_id().index();
                Err(SchedsimError::GraphIntegrity(format!(
                    "cycle detected in task graph involving task '{}'",
                    self.tasks[node].label
                )))
            }
        }
    }
}
