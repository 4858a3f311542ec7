// src/lib.rs

pub mod cli;
pub mod cluster;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod report;
pub mod types;
pub mod workload;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, ConfigFile};
use crate::dag::TaskGraph;
use crate::engine::{PlaybackEvent, Player, SeededDraw, Simulation};
use crate::report::{render_tick, render_timeline};

/// Everything the binary does after logging is up: resolve the config,
/// build the graph and cards, then dry-run, run straight through, or play
/// back on a timer until finished or interrupted.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;

    let graph = cfg.build_graph()?;
    let cluster = cfg.build_cluster()?;
    let options = cfg.sim_options();

    if args.dry_run {
        print_dry_run(&cfg, &graph);
        return Ok(());
    }

    let mut sim = Simulation::new(graph, cluster, options)?;

    match args.playback_ms {
        Some(ms) => {
            sim = play(sim, Duration::from_millis(ms)).await?;
        }
        None => {
            let summary = sim.run();
            if args.show_timeline {
                print!("{}", render_timeline(&sim));
            }
            println!("Simulation finished");
            println!("{summary}");
        }
    }

    debug!(ticks = sim.time(), "run complete");
    Ok(())
}

/// Config from `--config` (or `Schedsim.toml` in the working directory, if
/// present) with CLI overrides applied.
fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    let path = args
        .config
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| Some(default_config_path()).filter(|p| p.is_file()));

    let mut cfg = match path {
        Some(path) => load_and_validate(&path)
            .with_context(|| format!("loading config from {path:?}"))?,
        None => {
            info!("no config found; using the built-in fan workload");
            ConfigFile::default()
        }
    };

    if let Some(seed) = args.seed {
        cfg.sim.seed = seed;
    }
    if let Some(ref cards) = args.cards {
        cfg.sim.cards = cards.clone();
    }

    Ok(cfg)
}

/// Step the simulation on a timer, printing every tick.
async fn play(sim: Simulation<SeededDraw>, period: Duration) -> Result<Simulation<SeededDraw>> {
    let card_workers: Vec<usize> = sim.cluster().cards().iter().map(|c| c.workers()).collect();

    let (event_tx, mut event_rx) = mpsc::channel::<PlaybackEvent>(64);
    let (stop_tx, stop_rx) = watch::channel(false);

    // Ctrl-C → stop stepping.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = stop_tx.send(true);
    });

    let player = tokio::spawn(Player::new(sim, period).run(event_tx, stop_rx));

    while let Some(event) = event_rx.recv().await {
        match event {
            PlaybackEvent::Tick(snapshot) => print!("{}", render_tick(&card_workers, &snapshot)),
            PlaybackEvent::Finished(summary) => {
                println!("Simulation finished");
                println!("{summary}");
            }
            PlaybackEvent::Stopped(summary) => {
                println!("Simulation stopped");
                println!("{summary}");
            }
        }
    }

    player.await?
}

/// Simple dry-run output: cards, steal constants, graph size and root.
fn print_dry_run(cfg: &ConfigFile, graph: &TaskGraph) {
    println!("schedsim dry-run");
    println!("  sim.cards = {:?}", cfg.sim.cards);
    println!("  sim.seed = {}", cfg.sim.seed);
    println!("  sim.transfer_latency = {}", cfg.sim.transfer_latency);
    println!(
        "  steal: p_min = {}, p_max = {}, dist_max = {}",
        cfg.steal.p_min, cfg.steal.p_max, cfg.steal.dist_max
    );
    println!();

    match cfg.effective_workload() {
        Some(fan) => {
            println!("workload: fan");
            println!("  loops = {}", fan.loops);
            println!("  iterations = {}", fan.iterations);
            println!("  fanout = {}", fan.fanout);
            println!("  branch_len = {}", fan.branch_len);
        }
        None => {
            println!("workload: declared ({} tasks)", cfg.task.len());
            for (name, task) in cfg.task.iter() {
                println!("  - {name}");
                if !task.after.is_empty() {
                    println!("      after: {:?}", task.after);
                }
                if !task.horizon.is_empty() {
                    println!("      horizon: {:?}", task.horizon);
                }
                if task.unhealthy {
                    println!("      unhealthy: true");
                }
            }
        }
    }
    println!("tasks: {}", graph.len());
    match graph.validate() {
        Ok(root) => println!("root: {}", graph.task(root).label()),
        Err(e) => println!("invalid graph: {e}"),
    }

    debug!("dry-run complete (no simulation)");
}
