// src/types.rs

//! Small shared identifier and tag types.

use std::fmt;

/// Index of a compute card in the cluster.
pub type CardIndex = usize;

/// Index of a worker slot on a card.
pub type WorkerIndex = usize;

/// Stable handle of a task inside a [`crate::dag::TaskGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    /// Position of the task in the arena (insertion order).
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reporting classification of a task when it gets stolen.
///
/// Set by whoever builds the graph. The engine only counts steals per class;
/// the class never influences a scheduling decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StealClass {
    #[default]
    Healthy,
    Unhealthy,
}
