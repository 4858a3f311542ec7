// tests/placement.rs

use std::error::Error;

use schedsim::dag::TaskGraph;
use schedsim::engine::{crossing_edges, owning_card, transfer_cost};
use schedsim::types::TaskId;
use schedsim_test_utils::builders::{id_of, GraphBuilder};

type TestResult = Result<(), Box<dyn Error>>;

/// Graph `s -> p0..pN -> t` with each `p<i>` placed on `cards[i]`.
fn joined_on(cards: &[usize]) -> (TaskGraph, TaskId) {
    let labels: Vec<String> = (0..cards.len()).map(|i| format!("p{i}")).collect();
    let deps: Vec<&str> = labels.iter().map(String::as_str).collect();

    let mut builder = GraphBuilder::new().task("s");
    for label in &deps {
        builder = builder.after(label, &["s"]);
    }
    let mut graph = builder.after("t", &deps).build();

    for (label, &card) in deps.iter().zip(cards) {
        let id = id_of(&graph, label);
        graph.set_placement(id, card, Some(0));
    }
    let t = id_of(&graph, "t");
    (graph, t)
}

#[test]
fn task_without_predecessors_belongs_to_card_zero() -> TestResult {
    let graph = GraphBuilder::new().task("s").build();
    let s = id_of(&graph, "s");

    assert_eq!(owning_card(&graph, s, 4), 0);
    assert_eq!(transfer_cost(&graph, s, 0, 1), 0);

    Ok(())
}

#[test]
fn majority_card_owns_the_task() -> TestResult {
    let (graph, t) = joined_on(&[1, 1, 0]);
    assert_eq!(owning_card(&graph, t, 2), 1);

    Ok(())
}

#[test]
fn ties_go_to_the_card_counted_last() -> TestResult {
    let (graph, t) = joined_on(&[0, 1]);
    assert_eq!(owning_card(&graph, t, 2), 1);

    let (graph, t) = joined_on(&[1, 0]);
    assert_eq!(owning_card(&graph, t, 2), 0);

    // Tallies 2-2; card 0 reaches 2 last.
    let (graph, t) = joined_on(&[0, 1, 1, 0]);
    assert_eq!(owning_card(&graph, t, 2), 0);

    Ok(())
}

#[test]
fn unplaced_predecessors_do_not_vote() -> TestResult {
    let mut graph = GraphBuilder::new()
        .task("s")
        .after("a", &["s"])
        .after("b", &["s"])
        .after("t", &["a", "b"])
        .build();
    let b = id_of(&graph, "b");
    graph.set_placement(b, 2, Some(0));

    let t = id_of(&graph, "t");
    assert_eq!(owning_card(&graph, t, 3), 2);

    Ok(())
}

#[test]
fn transfer_cost_counts_edges_off_the_destination() -> TestResult {
    let (graph, t) = joined_on(&[0, 0, 1]);

    assert_eq!(crossing_edges(&graph, t, 1), 2);
    assert_eq!(crossing_edges(&graph, t, 0), 1);
    assert_eq!(transfer_cost(&graph, t, 1, 1), 2);
    assert_eq!(transfer_cost(&graph, t, 0, 1), 1);
    assert_eq!(transfer_cost(&graph, t, 1, 3), 6);

    Ok(())
}

#[test]
fn cost_is_zero_when_all_inputs_are_local() -> TestResult {
    let (graph, t) = joined_on(&[1, 1]);

    assert_eq!(transfer_cost(&graph, t, 1, 5), 0);
    assert_eq!(transfer_cost(&graph, t, 0, 5), 10);

    Ok(())
}

#[test]
fn cost_saturates_instead_of_wrapping() -> TestResult {
    let (graph, t) = joined_on(&[0, 0, 1]);

    assert_eq!(transfer_cost(&graph, t, 1, 2_147_483_648), u32::MAX);
    assert_eq!(transfer_cost(&graph, t, 1, u32::MAX), u32::MAX);

    Ok(())
}
