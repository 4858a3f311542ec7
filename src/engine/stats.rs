// src/engine/stats.rs

//! Reporting counters. None of these feed back into scheduling.

use std::fmt;

/// Steals initiated during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StealStats {
    /// Migrations to the owning card because inputs were split across cards.
    pub forced: u64,
    /// Heuristic steals away from a saturated owner.
    pub probabilistic: u64,
    /// Steals (of either kind) of tasks tagged unhealthy by the graph builder.
    pub unhealthy: u64,
}

impl StealStats {
    pub fn total(&self) -> u64 {
        self.forced + self.probabilistic
    }
}

/// End-of-run figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Makespan in ticks.
    pub ticks: u64,
    pub tasks_executed: usize,
    pub tasks_total: usize,
    pub steals: StealStats,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total time: {}", self.ticks)?;
        writeln!(f, "Tasks executed: {} / {}", self.tasks_executed, self.tasks_total)?;
        writeln!(
            f,
            "# of steals: {} (forced {}, probabilistic {})",
            self.steals.total(),
            self.steals.forced,
            self.steals.probabilistic
        )?;
        write!(f, "# of unhealthy steals: {}", self.steals.unhealthy)
    }
}
