// src/engine/simulation.rs

//! Tick-stepped simulation of work-stealing over a task graph.
//!
//! One [`Simulation`] owns the task graph, the cluster, both ready queues and
//! the timeline. It is synchronous and deterministic for a given draw source;
//! callers drive it with [`Simulation::step`] on whatever cadence they like,
//! one caller at a time.

use std::collections::VecDeque;
use std::mem;

use tracing::{debug, info, warn};

use crate::cluster::Cluster;
use crate::dag::{compute_distances, TaskGraph, UNREACHED_DISTANCE};
use crate::engine::placement::{crossing_edges, owning_card, transfer_cost};
use crate::engine::stats::{RunSummary, StealStats};
use crate::engine::steal::{steal_target, SeededDraw, StealDraw, StealPolicy};
use crate::engine::timeline::{Timeline, TimelineEntry};
use crate::errors::{Result, SchedsimError};
use crate::types::{CardIndex, StealClass, TaskId, WorkerIndex};

/// Largest accepted `transfer_latency`, in ticks per crossing edge.
pub const MAX_TRANSFER_LATENCY: u32 = 1 << 16;

/// Engine knobs that are not part of the graph or the cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    /// Seed for the default [`SeededDraw`].
    pub seed: u64,
    /// Ticks charged per dependency edge that crosses cards.
    pub transfer_latency: u32,
    pub steal: StealPolicy,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            transfer_latency: 1,
            steal: StealPolicy::default(),
        }
    }
}

/// Lifecycle of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// Never reset; nothing seeded.
    Idle,
    /// Ready tasks or in-flight transfers remain.
    Running,
    /// Ready queue empty and no transfer in flight.
    Finished,
}

/// Why a task left (or stayed in) the ready queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StealKind {
    /// Inputs were split across cards; moved to the owner.
    Forced,
    /// Owner was saturated and the heuristic fired.
    Probabilistic,
}

/// Outcome of dispatching one ready task in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Executed {
        card: CardIndex,
        worker: WorkerIndex,
    },
    Stolen {
        card: CardIndex,
        ticks: u32,
        kind: StealKind,
    },
    /// Stays ready for the next tick.
    Deferred,
}

#[derive(Debug, Clone)]
pub struct Simulation<D: StealDraw = SeededDraw> {
    graph: TaskGraph,
    cluster: Cluster,
    root: TaskId,
    policy: StealPolicy,
    transfer_latency: u32,
    draw: D,

    ready: VecDeque<TaskId>,
    next: VecDeque<TaskId>,
    timeline: Timeline,
    /// Decisions taken for ready tasks during the last step.
    decisions: Vec<(TaskId, Decision)>,
    time: u64,
    stats: StealStats,
    started: bool,
}

impl Simulation<SeededDraw> {
    /// Build a simulation drawing steal decisions from a ChaCha8 stream
    /// seeded with `options.seed`.
    pub fn new(graph: TaskGraph, cluster: Cluster, options: SimOptions) -> Result<Self> {
        let draw = SeededDraw::new(options.seed);
        Self::with_draw(graph, cluster, options, draw)
    }
}

impl<D: StealDraw> Simulation<D> {
    /// Build a simulation with an explicit draw source.
    ///
    /// The graph must satisfy [`TaskGraph::validate`]. The simulation starts
    /// `Idle`; call [`Simulation::reset`] (or [`Simulation::run`]) first.
    pub fn with_draw(
        graph: TaskGraph,
        cluster: Cluster,
        options: SimOptions,
        draw: D,
    ) -> Result<Self> {
        let root = graph.validate()?;
        if !(1..=MAX_TRANSFER_LATENCY).contains(&options.transfer_latency) {
            return Err(SchedsimError::ConfigError(format!(
                "transfer latency must be between 1 and {MAX_TRANSFER_LATENCY} ticks (got {})",
                options.transfer_latency
            )));
        }

        Ok(Self {
            graph,
            cluster,
            root,
            policy: options.steal,
            transfer_latency: options.transfer_latency,
            draw,
            ready: VecDeque::new(),
            next: VecDeque::new(),
            timeline: Timeline::new(),
            decisions: Vec::new(),
            time: 0,
            stats: StealStats::default(),
            started: false,
        })
    }

    pub fn state(&self) -> SimState {
        if !self.started {
            SimState::Idle
        } else if self.ready.is_empty() && self.cluster.pending_transfers() == 0 {
            SimState::Finished
        } else {
            SimState::Running
        }
    }

    /// Clear all run-local state and seed the ready queue with the root on
    /// card 0.
    pub fn reset(&mut self) {
        self.graph.clear_run_state();
        self.cluster.clear();
        self.draw.reset();
        self.ready.clear();
        self.next.clear();
        self.timeline.clear();
        self.decisions.clear();
        self.time = 0;
        self.stats = StealStats::default();

        compute_distances(&mut self.graph, self.root);
        self.graph.set_placement(self.root, 0, None);
        self.ready.push_back(self.root);
        self.started = true;

        info!(
            tasks = self.graph.len(),
            cards = self.cluster.len(),
            root = %self.graph.task(self.root).label(),
            "simulation reset"
        );
    }

    /// Advance one tick. Returns `false` without touching anything once the
    /// run has finished (or before the first reset).
    pub fn step(&mut self) -> bool {
        match self.state() {
            SimState::Idle => {
                warn!("step called before reset; nothing to simulate");
                return false;
            }
            SimState::Finished => return false,
            SimState::Running => {}
        }

        self.next.clear();
        self.decisions.clear();
        self.timeline.open_tick();
        self.cluster.reset_workers();

        // Landed transfers run first and may take worker slots from this
        // tick's ready tasks.
        for arrival in self.cluster.tick_transfers() {
            debug!(
                task = %self.graph.task(arrival.task).label(),
                card = arrival.card,
                tick = self.time,
                "transfer complete"
            );
            self.execute(arrival.task, arrival.card, arrival.worker);
        }

        let mut ready = mem::take(&mut self.ready);
        for task in ready.drain(..) {
            let decision = self.decide(task);
            if decision == Decision::Deferred {
                self.next.push_back(task);
            }
            self.decisions.push((task, decision));
        }
        self.ready = mem::replace(&mut self.next, ready);

        self.time += 1;

        if self.state() == SimState::Finished {
            let summary = self.summary();
            info!(
                ticks = summary.ticks,
                executed = summary.tasks_executed,
                steals = summary.steals.total(),
                unhealthy_steals = summary.steals.unhealthy,
                "simulation finished"
            );
        }

        true
    }

    /// Reset, then step until the run finishes.
    pub fn run(&mut self) -> RunSummary {
        self.reset();
        while self.step() {}
        self.summary()
    }

    /// Execute locally, migrate, or defer one ready task.
    fn decide(&mut self, task: TaskId) -> Decision {
        let card_count = self.cluster.len();
        let owner = owning_card(&self.graph, task, card_count);

        // Inputs split across cards always move to the owner.
        if crossing_edges(&self.graph, task, owner) > 0 {
            return self.steal(task, owner, StealKind::Forced);
        }

        if let Some(worker) = self.cluster.card_mut(owner).acquire_worker() {
            self.execute(task, owner, worker);
            return Decision::Executed {
                card: owner,
                worker,
            };
        }

        let min_distance = self
            .graph
            .task(task)
            .min_distance()
            .unwrap_or(UNREACHED_DISTANCE);
        if self
            .policy
            .should_steal(min_distance, card_count, &mut self.draw)
        {
            let target = steal_target(owner, card_count);
            return self.steal(task, target, StealKind::Probabilistic);
        }

        debug!(
            task = %self.graph.task(task).label(),
            card = owner,
            "owner saturated; task stays ready"
        );
        Decision::Deferred
    }

    /// Start moving `task` to `card`. Declined if the card already has a
    /// transfer in flight.
    fn steal(&mut self, task: TaskId, card: CardIndex, kind: StealKind) -> Decision {
        if self.cluster.card(card).has_transfer() {
            debug!(
                task = %self.graph.task(task).label(),
                card,
                "transfer lane busy; steal declined"
            );
            return Decision::Deferred;
        }

        // A zero-cost steal still needs one tick for the transfer to land.
        let ticks = transfer_cost(&self.graph, task, card, self.transfer_latency).max(1);
        if !self.cluster.card_mut(card).begin_transfer(task, ticks) {
            return Decision::Deferred;
        }

        self.graph.set_placement(task, card, None);
        match kind {
            StealKind::Forced => self.stats.forced += 1,
            StealKind::Probabilistic => self.stats.probabilistic += 1,
        }
        if self.graph.task(task).steal_class() == StealClass::Unhealthy {
            self.stats.unhealthy += 1;
        }

        debug!(
            task = %self.graph.task(task).label(),
            card,
            ticks,
            ?kind,
            tick = self.time,
            "steal"
        );
        Decision::Stolen { card, ticks, kind }
    }

    /// Run `task` on `card`/`worker` this tick and release its successors.
    fn execute(&mut self, task: TaskId, card: CardIndex, worker: WorkerIndex) {
        self.graph.set_placement(task, card, Some(worker));
        self.timeline.record(TimelineEntry { task, card, worker });
        debug!(
            task = %self.graph.task(task).label(),
            card,
            worker,
            tick = self.time,
            "exec"
        );

        for succ in self.graph.mark_satisfied(task) {
            compute_distances(&mut self.graph, succ);
            self.next.push_back(succ);
        }
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// Hand the graph back, with the placement of the last run still on it.
    pub fn into_graph(self) -> TaskGraph {
        self.graph
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn root(&self) -> TaskId {
        self.root
    }

    pub fn policy(&self) -> &StealPolicy {
        &self.policy
    }

    pub fn draw(&self) -> &D {
        &self.draw
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current tick: the number of completed steps since the last reset.
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn stats(&self) -> StealStats {
        self.stats
    }

    /// Tasks waiting for the next step, in dispatch order.
    pub fn ready_queue(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.ready.iter().copied()
    }

    /// Decisions taken for the ready tasks of the last step.
    pub fn last_decisions(&self) -> &[(TaskId, Decision)] {
        &self.decisions
    }

    pub fn pending_transfers(&self) -> usize {
        self.cluster.pending_transfers()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.time,
            tasks_executed: self.timeline.total_executed(),
            tasks_total: self.graph.len(),
            steals: self.stats,
        }
    }
}
