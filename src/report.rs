// src/report.rs

//! Plain-text rendering of worker occupancy and run results.

use std::fmt::Write;

use crate::engine::{OccupiedSlot, StealDraw, Simulation, TickSnapshot};

const IDLE_SLOT: &str = ".";

/// Grid of one tick: one row per card, one cell per worker slot.
///
/// ```text
/// tick 3 (ready 2, transfers 1, steals 1)
///   card 0 | a0,1 | b0,1 |
///   card 1 | a1,0 | .    |
/// ```
pub fn render_tick(card_workers: &[usize], snapshot: &TickSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "tick {} (ready {}, transfers {}, steals {})",
        snapshot.tick,
        snapshot.ready,
        snapshot.pending_transfers,
        snapshot.steals.total()
    );
    out.push_str(&render_grid(card_workers, &snapshot.slots));
    out
}

/// Occupancy grid of every tick in the simulation's timeline.
pub fn render_timeline<D: StealDraw>(sim: &Simulation<D>) -> String {
    let card_workers: Vec<usize> = sim.cluster().cards().iter().map(|c| c.workers()).collect();
    let mut out = String::new();

    for (tick, entries) in sim.timeline().ticks().enumerate() {
        let slots: Vec<OccupiedSlot> = entries
            .iter()
            .map(|e| OccupiedSlot {
                card: e.card,
                worker: e.worker,
                label: sim.graph().task(e.task).label().to_string(),
            })
            .collect();
        let _ = writeln!(out, "tick {tick}");
        out.push_str(&render_grid(&card_workers, &slots));
    }

    out
}

fn render_grid(card_workers: &[usize], slots: &[OccupiedSlot]) -> String {
    let mut cells: Vec<Vec<&str>> = card_workers
        .iter()
        .map(|&workers| vec![IDLE_SLOT; workers])
        .collect();

    for slot in slots {
        if let Some(cell) = cells
            .get_mut(slot.card)
            .and_then(|row| row.get_mut(slot.worker))
        {
            *cell = slot.label.as_str();
        }
    }

    let width = slots
        .iter()
        .map(|s| s.label.len())
        .max()
        .unwrap_or(0)
        .max(IDLE_SLOT.len());

    let mut out = String::new();
    for (card, row) in cells.iter().enumerate() {
        let _ = write!(out, "  card {card} |");
        for cell in row {
            let _ = write!(out, " {cell:<width$} |");
        }
        out.push('\n');
    }
    out
}
