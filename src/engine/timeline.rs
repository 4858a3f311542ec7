// src/engine/timeline.rs

//! Per-tick record of what ran where. Observation only; the engine never
//! reads it back.

use crate::types::{CardIndex, TaskId, WorkerIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub task: TaskId,
    pub card: CardIndex,
    pub worker: WorkerIndex,
}

/// Tasks that began execution, grouped by tick.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    ticks: Vec<Vec<TimelineEntry>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open_tick(&mut self) {
        self.ticks.push(Vec::new());
    }

    pub(crate) fn record(&mut self, entry: TimelineEntry) {
        match self.ticks.last_mut() {
            Some(current) => current.push(entry),
            None => self.ticks.push(vec![entry]),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.ticks.clear();
    }

    /// Number of ticks recorded so far.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn tick(&self, tick: usize) -> &[TimelineEntry] {
        self.ticks.get(tick).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn latest(&self) -> &[TimelineEntry] {
        self.ticks.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ticks(&self) -> impl Iterator<Item = &[TimelineEntry]> {
        self.ticks.iter().map(Vec::as_slice)
    }

    /// Every entry paired with its tick, in execution order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &TimelineEntry)> {
        self.ticks
            .iter()
            .enumerate()
            .flat_map(|(tick, entries)| entries.iter().map(move |e| (tick, e)))
    }

    /// Tick at which `task` executed, if it has.
    pub fn tick_of(&self, task: TaskId) -> Option<usize> {
        self.entries()
            .find(|(_, e)| e.task == task)
            .map(|(tick, _)| tick)
    }

    pub fn total_executed(&self) -> usize {
        self.ticks.iter().map(Vec::len).sum()
    }
}
