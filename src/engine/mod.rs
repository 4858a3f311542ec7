// src/engine/mod.rs

//! Simulation engine.
//!
//! - [`placement`]: owning card and transfer cost of a ready task.
//! - [`steal`]: the probabilistic steal heuristic and its draw source.
//! - [`simulation`]: the tick loop and its state machine.
//! - [`timeline`] and [`stats`]: what the run reports.
//! - [`player`]: async shell that steps a simulation on a timer.

pub mod placement;
pub mod player;
pub mod simulation;
pub mod stats;
pub mod steal;
pub mod timeline;

pub use placement::{crossing_edges, owning_card, transfer_cost};
pub use player::{OccupiedSlot, PlaybackEvent, Player, TickSnapshot};
pub use simulation::{
    Decision, SimOptions, SimState, Simulation, StealKind, MAX_TRANSFER_LATENCY,
};
pub use stats::{RunSummary, StealStats};
pub use steal::{steal_target, SeededDraw, StealDraw, StealPolicy};
pub use timeline::{Timeline, TimelineEntry};
