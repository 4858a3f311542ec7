use std::error::Error;

use schedsim::engine::{OccupiedSlot, RunSummary, StealStats, TickSnapshot};
use schedsim::report::{render_tick, render_timeline};
use schedsim_test_utils::builders::{simulation, GraphBuilder};
use schedsim_test_utils::draws::ScriptedDraw;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn tick_grid_pads_cells_to_longest_label() -> TestResult {
    let snapshot = TickSnapshot {
        tick: 3,
        slots: vec![
            OccupiedSlot {
                card: 0,
                worker: 0,
                label: "a0,1".to_string(),
            },
            OccupiedSlot {
                card: 1,
                worker: 0,
                label: "b".to_string(),
            },
        ],
        ready: 2,
        pending_transfers: 1,
        steals: StealStats {
            forced: 1,
            probabilistic: 0,
            unhealthy: 0,
        },
    };

    let out = render_tick(&[2, 1], &snapshot);

    assert_eq!(
        out,
        "tick 3 (ready 2, transfers 1, steals 1)\n\
         \x20 card 0 | a0,1 | .    |\n\
         \x20 card 1 | b    |\n"
    );

    Ok(())
}

#[test]
fn timeline_renders_one_grid_per_tick() -> TestResult {
    let graph = GraphBuilder::new()
        .task("s")
        .after("a", &["s"])
        .after("b", &["s"])
        .after("z", &["a", "b"])
        .build();
    let mut sim = simulation(graph, &[2], ScriptedDraw::never_steal());
    sim.run();

    let out = render_timeline(&sim);

    assert_eq!(
        out,
        "tick 0\n  card 0 | s | . |\n\
         tick 1\n  card 0 | a | b |\n\
         tick 2\n  card 0 | z | . |\n"
    );

    Ok(())
}

#[test]
fn latest_snapshot_reflects_last_step() -> TestResult {
    let graph = GraphBuilder::new()
        .task("s")
        .after("a", &["s"])
        .after("b", &["s"])
        .build();
    let mut sim = simulation(graph, &[1], ScriptedDraw::never_steal());
    sim.reset();
    sim.step();

    let snapshot = TickSnapshot::latest(&sim);
    assert_eq!(snapshot.tick, 0);
    assert_eq!(snapshot.ready, 2);
    assert_eq!(snapshot.pending_transfers, 0);
    assert_eq!(
        snapshot.slots,
        vec![OccupiedSlot {
            card: 0,
            worker: 0,
            label: "s".to_string()
        }]
    );

    Ok(())
}

#[test]
fn run_summary_prints_totals() -> TestResult {
    let summary = RunSummary {
        ticks: 42,
        tasks_executed: 10,
        tasks_total: 10,
        steals: StealStats {
            forced: 2,
            probabilistic: 3,
            unhealthy: 1,
        },
    };

    assert_eq!(
        summary.to_string(),
        "Total time: 42\n\
         Tasks executed: 10 / 10\n\
         # of steals: 5 (forced 2, probabilistic 3)\n\
         # of unhealthy steals: 1"
    );

    Ok(())
}
