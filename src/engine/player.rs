// src/engine/player.rs

//! Timer-driven playback of a simulation.
//!
//! The simulation itself is synchronous; this async shell only decides
//! *when* to call `step()` and publishes what happened in each tick, the way
//! an interactive front-end would consume it. Stopping is just ceasing to
//! step.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::engine::simulation::{SimState, Simulation};
use crate::engine::stats::{RunSummary, StealStats};
use crate::engine::steal::StealDraw;
use crate::types::{CardIndex, WorkerIndex};

/// One occupied worker slot in a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedSlot {
    pub card: CardIndex,
    pub worker: WorkerIndex,
    pub label: String,
}

/// Everything a viewer needs to draw one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSnapshot {
    pub tick: u64,
    pub slots: Vec<OccupiedSlot>,
    pub ready: usize,
    pub pending_transfers: usize,
    pub steals: StealStats,
}

impl TickSnapshot {
    /// Snapshot of the most recently completed tick.
    pub fn latest<D: StealDraw>(sim: &Simulation<D>) -> Self {
        let slots = sim
            .timeline()
            .latest()
            .iter()
            .map(|e| OccupiedSlot {
                card: e.card,
                worker: e.worker,
                label: sim.graph().task(e.task).label().to_string(),
            })
            .collect();

        Self {
            tick: sim.time().saturating_sub(1),
            slots,
            ready: sim.ready_queue().count(),
            pending_transfers: sim.pending_transfers(),
            steals: sim.stats(),
        }
    }
}

/// Events published by the [`Player`].
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    Tick(TickSnapshot),
    /// The run reached `Finished`.
    Finished(RunSummary),
    /// Stepping was stopped before the run finished.
    Stopped(RunSummary),
}

/// Steps a simulation once per `period`.
pub struct Player<D: StealDraw> {
    sim: Simulation<D>,
    period: Duration,
}

impl<D: StealDraw> Player<D> {
    pub fn new(sim: Simulation<D>, period: Duration) -> Self {
        Self { sim, period }
    }

    /// Reset the simulation and play it to the end, or until `true` is sent
    /// on `stop`.
    ///
    /// Returns the simulation so the caller can inspect the final timeline.
    /// A dropped event receiver is treated as an error.
    pub async fn run(
        mut self,
        events: mpsc::Sender<PlaybackEvent>,
        mut stop: watch::Receiver<bool>,
    ) -> Result<Simulation<D>> {
        self.sim.reset();

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut stop_open = true;

        info!(period_ms = self.period.as_millis() as u64, "playback started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.sim.step() {
                        events.send(PlaybackEvent::Finished(self.sim.summary())).await?;
                        break;
                    }
                    events.send(PlaybackEvent::Tick(TickSnapshot::latest(&self.sim))).await?;

                    if self.sim.state() == SimState::Finished {
                        events.send(PlaybackEvent::Finished(self.sim.summary())).await?;
                        break;
                    }
                }
                changed = stop.changed(), if stop_open => {
                    if changed.is_err() {
                        // Nobody can ask us to stop anymore; keep playing.
                        debug!("stop channel closed");
                        stop_open = false;
                    } else {
                        let requested = *stop.borrow();
                        if requested {
                            info!(tick = self.sim.time(), "playback stopped");
                            events.send(PlaybackEvent::Stopped(self.sim.summary())).await?;
                            break;
                        }
                    }
                }
            }
        }

        Ok(self.sim)
    }
}
