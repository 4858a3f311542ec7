// src/cluster/mod.rs

//! Resource model: the cards of the simulated machine.

pub mod card;

pub use card::{Card, Transfer};

use crate::errors::{Result, SchedsimError};
use crate::types::{CardIndex, TaskId, WorkerIndex};

/// A transfer that completed this tick and got a worker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub card: CardIndex,
    pub worker: WorkerIndex,
    pub task: TaskId,
}

/// Ordered set of cards. Card indices are positions in this list.
#[derive(Debug, Clone)]
pub struct Cluster {
    cards: Vec<Card>,
}

impl Cluster {
    /// Build a cluster from per-card worker counts.
    ///
    /// Every card needs at least one worker so that a finished transfer can
    /// always run.
    pub fn new(workers: impl IntoIterator<Item = usize>) -> Result<Self> {
        let cards: Vec<Card> = workers.into_iter().map(Card::new).collect();
        if cards.is_empty() {
            return Err(SchedsimError::ConfigError(
                "cluster needs at least one card".to_string(),
            ));
        }
        if let Some(idx) = cards.iter().position(|c| c.workers() == 0) {
            return Err(SchedsimError::ConfigError(format!(
                "card {idx} has no worker slots"
            )));
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, idx: CardIndex) -> &Card {
        &self.cards[idx]
    }

    pub fn card_mut(&mut self, idx: CardIndex) -> &mut Card {
        &mut self.cards[idx]
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn reset_workers(&mut self) {
        for card in &mut self.cards {
            card.reset_workers();
        }
    }

    /// Advance every in-flight transfer and return those that landed.
    pub fn tick_transfers(&mut self) -> Vec<Arrival> {
        self.cards
            .iter_mut()
            .enumerate()
            .filter_map(|(card, c)| {
                c.tick_transfer()
                    .map(|(task, worker)| Arrival { card, worker, task })
            })
            .collect()
    }

    pub fn pending_transfers(&self) -> usize {
        self.cards.iter().filter(|c| c.has_transfer()).count()
    }

    /// Drop all in-flight transfers and rewind worker cursors.
    pub(crate) fn clear(&mut self) {
        for card in &mut self.cards {
            *card = Card::new(card.workers());
        }
    }
}
