// src/cluster/card.rs

//! A single compute card: worker slots plus one inbound transfer lane.

use crate::types::{TaskId, WorkerIndex};

/// Data transfer of a stolen task towards this card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub task: TaskId,
    /// Ticks left before the task can run here.
    pub remaining: u32,
}

/// Compute card with a fixed number of worker slots.
///
/// Workers are not held across ticks: the cursor is rewound every tick and
/// each task that runs in that tick takes the next slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    workers: usize,
    next_worker: usize,
    transfer: Option<Transfer>,
}

impl Card {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            next_worker: 0,
            transfer: None,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Slots already handed out this tick.
    pub fn busy_workers(&self) -> usize {
        self.next_worker
    }

    pub fn has_free_worker(&self) -> bool {
        self.next_worker < self.workers
    }

    /// Take the next free worker slot for this tick.
    pub fn acquire_worker(&mut self) -> Option<WorkerIndex> {
        if !self.has_free_worker() {
            return None;
        }
        let worker = self.next_worker;
        self.next_worker += 1;
        Some(worker)
    }

    pub fn reset_workers(&mut self) {
        self.next_worker = 0;
    }

    pub fn transfer(&self) -> Option<&Transfer> {
        self.transfer.as_ref()
    }

    pub fn has_transfer(&self) -> bool {
        self.transfer.is_some()
    }

    /// Start moving `task` to this card. Refused while another transfer is
    /// in flight.
    #[must_use]
    pub fn begin_transfer(&mut self, task: TaskId, ticks: u32) -> bool {
        if self.transfer.is_some() {
            return false;
        }
        self.transfer = Some(Transfer {
            task,
            remaining: ticks,
        });
        true
    }

    /// Advance the in-flight transfer by one tick.
    ///
    /// When the countdown hits zero the task takes a worker slot on this card
    /// and the lane is freed. If no slot is free the transfer stays parked at
    /// zero and is retried on the next tick.
    pub fn tick_transfer(&mut self) -> Option<(TaskId, WorkerIndex)> {
        let transfer = self.transfer.as_mut()?;
        transfer.remaining = transfer.remaining.saturating_sub(1);
        if transfer.remaining > 0 {
            return None;
        }

        let task = transfer.task;
        let worker = self.acquire_worker()?;
        self.transfer = None;
        Some((task, worker))
    }
}
