// src/cli.rs

//! Command-line surface of the `schedsim` binary.

use clap::{Parser, ValueEnum};

/// Simulate work-stealing of a task DAG across compute cards.
///
/// Without `--config` (and without a `Schedsim.toml` in the working
/// directory) the built-in fan workload runs on four 20-worker cards.
#[derive(Debug, Clone, Parser)]
#[command(name = "schedsim", version)]
pub struct CliArgs {
    /// TOML file with `[sim]`, `[steal]`, `[workload]` or `[task.<name>]`
    /// sections.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Seed of the steal draws; replaces `[sim].seed`.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Worker slots per card, e.g. `--cards 20,20`; replaces `[sim].cards`.
    #[arg(long, value_name = "N,N,..", value_delimiter = ',')]
    pub cards: Option<Vec<u32>>,

    /// Play the run back one tick every MS milliseconds instead of running
    /// it straight through. Ctrl-C stops stepping.
    #[arg(long, value_name = "MS")]
    pub playback_ms: Option<u64>,

    /// After a straight run, print the occupancy grid of every tick.
    #[arg(long)]
    pub show_timeline: bool,

    /// Verbosity for every log target. Falls back to `SCHEDSIM_LOG`, then
    /// `info`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the settings and graph size, then exit without simulating.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// `EnvFilter` directive enabling this level everywhere.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
