// src/workload/fan.rs

//! Fan-out / fan-in loop workload.
//!
//! ```text
//!          +-- branch --+            +-- branch --+
//! start ---+-- branch --+-- a0 ------+-- branch --+-- a1 ... a(n-1) --+
//!          +-- branch --+            +-- branch --+                    |
//!   (one such loop per prefix a, b, c, ...)                            +-- finish
//! ```
//!
//! Join tasks measure criticality against `finish`; branch tasks against the
//! join they feed. Branch tasks are tagged unhealthy to steal.

use serde::Deserialize;
use tracing::debug;

use crate::dag::TaskGraph;
use crate::types::{StealClass, TaskId};

/// Dimensions of the generated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FanWorkload {
    /// Independent loops between `start` and `finish`.
    pub loops: usize,
    /// Join points per loop.
    pub iterations: usize,
    /// Parallel branches between two consecutive join points.
    pub fanout: usize,
    /// Tasks per branch.
    pub branch_len: usize,
}

impl Default for FanWorkload {
    fn default() -> Self {
        Self {
            loops: 4,
            iterations: 20,
            fanout: 20,
            branch_len: 20,
        }
    }
}

impl FanWorkload {
    /// Total number of tasks [`FanWorkload::build`] creates.
    pub fn task_count(&self) -> usize {
        2 + self.loops * self.iterations * (1 + self.fanout * self.branch_len)
    }

    /// Build the graph. The root is `start`.
    pub fn build(&self) -> TaskGraph {
        let mut graph = TaskGraph::new();
        let start = graph.add_task("start");
        let finish = graph.add_task("finish");
        graph.set_root(start);

        for l in 0..self.loops {
            let prefix = loop_prefix(l);
            self.build_loop(&mut graph, &prefix, start, finish);
        }

        debug!(
            tasks = graph.len(),
            loops = self.loops,
            fanout = self.fanout,
            "fan workload built"
        );
        graph
    }

    fn build_loop(&self, graph: &mut TaskGraph, prefix: &str, start: TaskId, finish: TaskId) {
        let mut prev = start;

        for i in 0..self.iterations {
            let join = graph.add_task(format!("{prefix}{i}"));
            graph.set_horizon(join, [finish]);
            self.build_fan(graph, prefix, prev, join);
            prev = join;
        }

        if prev != start {
            graph.add_dependency(prev, finish);
        }
    }

    fn build_fan(&self, graph: &mut TaskGraph, prefix: &str, from: TaskId, join: TaskId) {
        for branch in 0..self.fanout {
            let mut prev = from;
            for i in 0..self.branch_len {
                let task = graph.add_task(format!("{prefix}{branch},{i}"));
                graph.set_horizon(task, [join]);
                graph.set_steal_class(task, StealClass::Unhealthy);
                graph.add_dependency(prev, task);
                prev = task;
            }
            graph.add_dependency(prev, join);
        }
    }
}

/// `a`..`z`, then `l26_`, `l27_`, ... The underscore keeps these labels
/// apart from the single-letter loops.
fn loop_prefix(idx: usize) -> String {
    match u8::try_from(idx) {
        Ok(n) if n < 26 => char::from(b'a' + n).to_string(),
        _ => format!("l{idx}_"),
    }
}
