// tests/simulation_scenarios.rs

use std::error::Error;

use schedsim::cluster::Cluster;
use schedsim::dag::TaskGraph;
use schedsim::engine::{
    Decision, SimOptions, SimState, Simulation, StealDraw, StealKind, StealStats,
    MAX_TRANSFER_LATENCY,
};
use schedsim::errors::SchedsimError;
use schedsim::workload::FanWorkload;
use schedsim_test_utils::builders::{id_of, simulation, GraphBuilder};
use schedsim_test_utils::draws::ScriptedDraw;
use schedsim_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// `s -> a, s -> b, a -> z, b -> z`
fn diamond() -> TaskGraph {
    GraphBuilder::new()
        .task("s")
        .after("a", &["s"])
        .after("b", &["s"])
        .after("z", &["a", "b"])
        .build()
}

/// Labels that executed in each tick, in execution order.
fn labels_per_tick<D: StealDraw>(sim: &Simulation<D>) -> Vec<Vec<String>> {
    sim.timeline()
        .ticks()
        .map(|tick| {
            tick.iter()
                .map(|e| sim.graph().task(e.task).label().to_string())
                .collect()
        })
        .collect()
}

fn ticks(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn diamond_on_one_wide_card_runs_level_by_level() -> TestResult {
    init_tracing();

    let mut sim = simulation(diamond(), &[2], ScriptedDraw::never_steal());
    let summary = sim.run();

    assert_eq!(sim.state(), SimState::Finished);
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.tasks_executed, 4);
    assert_eq!(summary.tasks_total, 4);
    assert_eq!(summary.steals, StealStats::default());
    assert_eq!(labels_per_tick(&sim), ticks(&[&["s"], &["a", "b"], &["z"]]));
    assert_eq!(sim.draw().drawn(), 0);

    Ok(())
}

#[test]
fn single_narrow_card_defers_without_drawing() -> TestResult {
    init_tracing();

    let mut sim = simulation(diamond(), &[1], ScriptedDraw::always_steal());
    let summary = sim.run();

    assert_eq!(summary.ticks, 4);
    assert_eq!(summary.steals.total(), 0);
    assert_eq!(
        labels_per_tick(&sim),
        ticks(&[&["s"], &["a"], &["b"], &["z"]])
    );
    assert_eq!(sim.draw().drawn(), 0);

    Ok(())
}

#[test]
fn root_runs_first_on_card_zero_and_releases_its_successors() -> TestResult {
    init_tracing();

    let graph = GraphBuilder::new()
        .task("s")
        .after("a", &["s"])
        .after("b", &["s"])
        .after("h", &["a", "b"])
        .horizon("a", &["h"])
        .horizon("b", &["h"])
        .build();
    let (s, a, b) = (id_of(&graph, "s"), id_of(&graph, "a"), id_of(&graph, "b"));
    let mut sim = simulation(graph, &[1, 1], ScriptedDraw::never_steal());
    sim.reset();

    assert!(sim.step());

    assert_eq!(sim.graph().task(s).card(), Some(0));
    assert_eq!(sim.graph().task(s).worker(), Some(0));
    assert_eq!(
        sim.last_decisions(),
        &[(s, Decision::Executed { card: 0, worker: 0 })]
    );
    assert_eq!(sim.ready_queue().collect::<Vec<_>>(), vec![a, b]);
    assert!(sim.graph().task(a).is_eligible());
    assert!(sim.graph().task(b).is_eligible());
    assert_eq!(sim.graph().task(a).card(), None);
    assert_eq!(sim.timeline().tick(0).len(), 1);

    Ok(())
}

#[test]
fn split_inputs_force_a_steal_to_the_owner() -> TestResult {
    init_tracing();

    let graph = diamond();
    let (s, a, b, z) = (
        id_of(&graph, "s"),
        id_of(&graph, "a"),
        id_of(&graph, "b"),
        id_of(&graph, "z"),
    );
    // One heuristic steal for `b`, nothing after that.
    let mut sim = simulation(graph, &[1, 1], ScriptedDraw::new(&[0], 99));
    sim.reset();

    assert_eq!(sim.state(), SimState::Running);
    assert_eq!(sim.ready_queue().collect::<Vec<_>>(), vec![s]);

    // tick 0
    assert!(sim.step());
    assert_eq!(sim.ready_queue().collect::<Vec<_>>(), vec![a, b]);

    // tick 1: `a` takes card 0's only worker, `b` is stolen to card 1.
    assert!(sim.step());
    assert_eq!(
        sim.last_decisions(),
        &[
            (a, Decision::Executed { card: 0, worker: 0 }),
            (
                b,
                Decision::Stolen {
                    card: 1,
                    ticks: 1,
                    kind: StealKind::Probabilistic
                }
            ),
        ]
    );
    assert_eq!(sim.pending_transfers(), 1);
    assert_eq!(sim.graph().task(b).card(), Some(1));
    assert_eq!(sim.graph().task(b).worker(), None);

    // tick 2: `b` lands on card 1.
    assert!(sim.step());
    assert_eq!(sim.graph().task(b).worker(), Some(0));
    assert_eq!(sim.ready_queue().collect::<Vec<_>>(), vec![z]);

    // tick 3: `z` has one input per card; the tie goes to card 1.
    assert!(sim.step());
    assert_eq!(
        sim.last_decisions(),
        &[(
            z,
            Decision::Stolen {
                card: 1,
                ticks: 1,
                kind: StealKind::Forced
            }
        )]
    );

    // tick 4
    assert!(sim.step());
    assert_eq!(sim.state(), SimState::Finished);
    assert_eq!(sim.graph().task(z).card(), Some(1));

    let summary = sim.summary();
    assert_eq!(summary.ticks, 5);
    assert_eq!(summary.steals.forced, 1);
    assert_eq!(summary.steals.probabilistic, 1);
    assert_eq!(summary.steals.total(), 2);
    assert_eq!(
        labels_per_tick(&sim),
        ticks(&[&["s"], &["a"], &["b"], &[], &["z"]])
    );
    assert_eq!(sim.draw().drawn(), 1);

    Ok(())
}

#[test]
fn transfer_latency_scales_steal_duration() -> TestResult {
    init_tracing();

    let cluster = Cluster::new([1, 1])?;
    let options = SimOptions {
        transfer_latency: 3,
        ..SimOptions::default()
    };
    let mut sim = Simulation::with_draw(diamond(), cluster, options, ScriptedDraw::new(&[0], 99))?;
    let summary = sim.run();

    // b: stolen at 1, lands at 4. z: forced at 5, lands at 8.
    assert_eq!(summary.ticks, 9);
    assert_eq!(
        labels_per_tick(&sim),
        ticks(&[&["s"], &["a"], &[], &[], &["b"], &[], &[], &[], &["z"]])
    );

    Ok(())
}

#[test]
fn split_inputs_steal_even_at_the_largest_latency() -> TestResult {
    init_tracing();

    let cluster = Cluster::new([1, 1])?;
    let options = SimOptions {
        transfer_latency: MAX_TRANSFER_LATENCY,
        ..SimOptions::default()
    };
    let graph = diamond();
    let z = id_of(&graph, "z");
    let mut sim = Simulation::with_draw(graph, cluster, options, ScriptedDraw::new(&[0], 99))?;
    let summary = sim.run();

    let latency = u64::from(MAX_TRANSFER_LATENCY);
    assert_eq!(summary.steals.forced, 1);
    assert_eq!(summary.ticks, 3 + 2 * latency);
    assert_eq!(sim.graph().task(z).card(), Some(1));

    Ok(())
}

#[test]
fn busy_transfer_lane_defers_the_next_steal() -> TestResult {
    init_tracing();

    let graph = GraphBuilder::new()
        .task("s")
        .after("a", &["s"])
        .after("b", &["s"])
        .after("c", &["s"])
        .build();
    let (a, b, c) = (id_of(&graph, "a"), id_of(&graph, "b"), id_of(&graph, "c"));
    let mut sim = simulation(graph, &[1, 1, 1], ScriptedDraw::always_steal());
    sim.reset();

    sim.step();
    sim.step();
    assert_eq!(
        sim.last_decisions(),
        &[
            (a, Decision::Executed { card: 0, worker: 0 }),
            (
                b,
                Decision::Stolen {
                    card: 1,
                    ticks: 1,
                    kind: StealKind::Probabilistic
                }
            ),
            (c, Decision::Deferred),
        ]
    );
    assert_eq!(sim.ready_queue().collect::<Vec<_>>(), vec![c]);

    while sim.step() {}

    // Round-robin never reaches the third card.
    assert!(sim.timeline().entries().all(|(_, e)| e.card != 2));
    assert_eq!(sim.graph().task(c).card(), Some(0));
    assert_eq!(sim.time(), 3);

    Ok(())
}

#[test]
fn unhealthy_tag_only_changes_the_counter() -> TestResult {
    init_tracing();

    let healthy = diamond();
    let unhealthy = GraphBuilder::new()
        .task("s")
        .after("a", &["s"])
        .after("b", &["s"])
        .after("z", &["a", "b"])
        .unhealthy("b")
        .unhealthy("z")
        .build();

    let mut plain = simulation(healthy, &[1, 1], ScriptedDraw::new(&[0], 99));
    let mut tagged = simulation(unhealthy, &[1, 1], ScriptedDraw::new(&[0], 99));
    let plain_summary = plain.run();
    let tagged_summary = tagged.run();

    assert_eq!(plain_summary.steals.unhealthy, 0);
    assert_eq!(tagged_summary.steals.unhealthy, 2);
    assert_eq!(plain_summary.ticks, tagged_summary.ticks);
    assert_eq!(plain_summary.steals.total(), tagged_summary.steals.total());
    assert_eq!(labels_per_tick(&plain), labels_per_tick(&tagged));

    Ok(())
}

#[test]
fn step_is_a_noop_before_reset_and_after_finish() -> TestResult {
    init_tracing();

    let mut sim = simulation(diamond(), &[2], ScriptedDraw::never_steal());
    assert_eq!(sim.state(), SimState::Idle);
    assert!(!sim.step());
    assert_eq!(sim.time(), 0);
    assert!(sim.timeline().is_empty());

    sim.run();
    let time = sim.time();
    let executed = sim.timeline().total_executed();

    assert!(!sim.step());
    assert!(!sim.step());
    assert_eq!(sim.time(), time);
    assert_eq!(sim.timeline().total_executed(), executed);
    assert_eq!(sim.state(), SimState::Finished);

    Ok(())
}

#[test]
fn reset_makes_runs_repeatable() -> TestResult {
    init_tracing();

    let fan = FanWorkload {
        loops: 2,
        iterations: 3,
        fanout: 4,
        branch_len: 2,
    };
    let cluster = Cluster::new([2, 3])?;
    let options = SimOptions {
        seed: 11,
        ..SimOptions::default()
    };

    let mut sim = Simulation::new(fan.build(), cluster.clone(), options)?;
    let first = sim.run();
    let first_timeline = sim.timeline().clone();

    let second = sim.run();
    assert_eq!(first, second);
    assert_eq!(
        first_timeline.entries().collect::<Vec<_>>(),
        sim.timeline().entries().collect::<Vec<_>>()
    );

    let mut fresh = Simulation::new(fan.build(), cluster, options)?;
    assert_eq!(fresh.run(), first);

    Ok(())
}

#[test]
fn fan_workload_executes_every_task_once_in_dependency_order() -> TestResult {
    init_tracing();

    let fan = FanWorkload {
        loops: 3,
        iterations: 4,
        fanout: 5,
        branch_len: 3,
    };
    let cards = [3usize, 2, 4];
    let cluster = Cluster::new(cards)?;
    let options = SimOptions {
        seed: 3,
        ..SimOptions::default()
    };
    let mut sim = Simulation::new(fan.build(), cluster, options)?;
    let summary = sim.run();

    assert_eq!(summary.tasks_executed, fan.task_count());
    assert_eq!(summary.tasks_total, fan.task_count());
    assert!(summary.steals.unhealthy <= summary.steals.total());

    let graph = sim.graph();
    for (id, task) in graph.tasks() {
        let tick = sim
            .timeline()
            .tick_of(id)
            .ok_or_else(|| format!("task {} never ran", task.label()))?;
        for &pred in task.predecessors() {
            let pred_tick = sim.timeline().tick_of(pred).ok_or("predecessor never ran")?;
            assert!(pred_tick < tick, "{} ran before its input", task.label());
        }
        assert_eq!(task.satisfied(), task.predecessors().len());
    }

    for tick in sim.timeline().ticks() {
        for (card, &workers) in cards.iter().enumerate() {
            let mut used: Vec<_> = tick.iter().filter(|e| e.card == card).map(|e| e.worker).collect();
            assert!(used.len() <= workers);
            used.sort_unstable();
            used.dedup();
            assert!(used.iter().all(|&w| w < workers));
        }
    }

    Ok(())
}

#[test]
fn construction_rejects_bad_input() {
    let cluster = Cluster::new([1]).expect("valid cluster");
    let options = SimOptions {
        transfer_latency: 0,
        ..SimOptions::default()
    };
    assert!(matches!(
        Simulation::new(diamond(), cluster.clone(), options),
        Err(SchedsimError::ConfigError(_))
    ));

    let options = SimOptions {
        transfer_latency: MAX_TRANSFER_LATENCY + 1,
        ..SimOptions::default()
    };
    assert!(matches!(
        Simulation::new(diamond(), cluster.clone(), options),
        Err(SchedsimError::ConfigError(_))
    ));

    let two_roots = GraphBuilder::new().task("s").task("t").after("a", &["s", "t"]).build();
    assert!(matches!(
        Simulation::new(two_roots, cluster, SimOptions::default()),
        Err(SchedsimError::GraphIntegrity(_))
    ));
}
