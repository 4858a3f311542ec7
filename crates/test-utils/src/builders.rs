#![allow(dead_code)]

use std::collections::HashMap;

use schedsim::cluster::Cluster;
use schedsim::dag::TaskGraph;
use schedsim::engine::{SimOptions, Simulation, StealDraw};
use schedsim::types::{StealClass, TaskId};

/// Label-based builder for `TaskGraph` to simplify test setup.
///
/// The first task added becomes the root unless `root` says otherwise.
pub struct GraphBuilder {
    graph: TaskGraph,
    ids: HashMap<String, TaskId>,
    root: Option<TaskId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: TaskGraph::new(),
            ids: HashMap::new(),
            root: None,
        }
    }

    /// Add a task with no dependencies.
    pub fn task(mut self, label: &str) -> Self {
        self.id(label);
        self
    }

    /// Add `label` depending on each of `deps`, in order.
    pub fn after(mut self, label: &str, deps: &[&str]) -> Self {
        let id = self.id(label);
        for dep in deps {
            let dep_id = self.id(dep);
            self.graph.add_dependency(dep_id, id);
        }
        self
    }

    pub fn horizon(mut self, label: &str, horizon: &[&str]) -> Self {
        let id = self.id(label);
        let hs: Vec<TaskId> = horizon.iter().map(|h| self.id(h)).collect();
        self.graph.set_horizon(id, hs);
        self
    }

    pub fn unhealthy(mut self, label: &str) -> Self {
        let id = self.id(label);
        self.graph.set_steal_class(id, StealClass::Unhealthy);
        self
    }

    pub fn root(mut self, label: &str) -> Self {
        let id = self.id(label);
        self.root = Some(id);
        self
    }

    pub fn build(mut self) -> TaskGraph {
        if let Some(root) = self.root.or_else(|| self.graph.ids().next()) {
            self.graph.set_root(root);
        }
        self.graph
    }

    fn id(&mut self, label: &str) -> TaskId {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.graph.add_task(label);
        self.ids.insert(label.to_string(), id);
        id
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a simulation over `graph` with the given worker counts and draw
/// source, panicking on invalid input.
pub fn simulation<D: StealDraw>(graph: TaskGraph, cards: &[usize], draw: D) -> Simulation<D> {
    let cluster = Cluster::new(cards.iter().copied()).expect("valid cluster");
    Simulation::with_draw(graph, cluster, SimOptions::default(), draw).expect("valid graph")
}

/// Look up a task by label, panicking if it does not exist.
pub fn id_of(graph: &TaskGraph, label: &str) -> TaskId {
    graph
        .find(label)
        .unwrap_or_else(|| panic!("no task labelled '{label}'"))
}
