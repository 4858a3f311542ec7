// src/engine/placement.rs

//! Where a ready task belongs and what it costs to move it.

use crate::dag::TaskGraph;
use crate::types::{CardIndex, TaskId};

/// Plurality vote over the cards that ran `task`'s predecessors.
///
/// Predecessors are visited in edge-insertion order and the owner moves to
/// any card whose tally reaches the best tally so far, so ties go to the card
/// counted last. A task without predecessors belongs to card 0.
pub fn owning_card(graph: &TaskGraph, task: TaskId, card_count: usize) -> CardIndex {
    let mut tally = vec![0usize; card_count];
    let mut owner = 0;
    let mut best = 0;

    for &pred in graph.task(task).predecessors() {
        let Some(card) = graph.task(pred).card() else {
            continue;
        };
        tally[card] += 1;
        if tally[card] >= best {
            owner = card;
            best = tally[card];
        }
    }

    owner
}

/// Number of predecessors whose data does not live on `dest`.
pub fn crossing_edges(graph: &TaskGraph, task: TaskId, dest: CardIndex) -> u32 {
    graph
        .task(task)
        .predecessors()
        .iter()
        .filter(|&&pred| graph.task(pred).card() != Some(dest))
        .count() as u32
}

/// Ticks needed to bring `task`'s inputs to `dest`: a fixed latency per
/// crossing edge, independent of data size. Saturates at `u32::MAX`.
pub fn transfer_cost(graph: &TaskGraph, task: TaskId, dest: CardIndex, latency: u32) -> u32 {
    crossing_edges(graph, task, dest).saturating_mul(latency)
}
