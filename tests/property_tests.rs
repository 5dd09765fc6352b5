//! Property-based tests for graph construction and machine behaviour.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use fsm_graph::builder::{BuildStep, TransitionMapBuilder};
use fsm_graph::config::{Environment, PartialFsmConfig};
use fsm_graph::core::{State, TransitionRecord, TransitionResult, TransitionType};
use fsm_graph::diagram::{render_state_diagram, DiagramDirection};
use fsm_graph::graph::StateGraph;
use fsm_graph::log::{DebugLogStore, LogCapacity};
use fsm_graph::machine::{Fsm, StateOverride};
use fsm_graph::transition_map;
use proptest::prelude::*;
use serde_json::{json, Value};

const CYCLIC_S2_TB: &str = "stateDiagram-v2\ndirection TB\n[*] --> Init\nInit --> s1\ns1 --> s2\ns2:::highlight --> s3\ns3 --> s1\nclassDef highlight font-weight:bold,stroke-width:3px,fill:#c6c6f9,stroke:#7d4ce1";

fn cyclic_graph() -> StateGraph {
    StateGraph::new(
        ["s1", "s2", "s3"],
        transition_map! {
            Init => [s1],
            s1 => [s2],
            s2 => [s3],
            s3 => [s1],
        },
    )
    .unwrap()
}

fn machine_at(state: &State) -> Fsm {
    let mut fsm = Fsm::new(cyclic_graph(), PartialFsmConfig::default(), Environment::Development);
    if state != &State::Init {
        fsm.override_state(StateOverride::new(state.clone()), false);
    }
    fsm
}

fn pick(pool: &[State], mask: u32) -> Vec<State> {
    pool.iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, state)| state.clone())
        .collect()
}

fn record(n: usize) -> TransitionRecord {
    TransitionRecord::new(
        Some(State::Init),
        State::declared(format!("s{n}")),
        TransitionType::Change,
        TransitionResult::Success,
        "success",
        json!(n),
    )
}

prop_compose! {
    fn cyclic_state()(variant in 0..4u8) -> State {
        match variant {
            0 => State::Init,
            n => State::declared(format!("s{n}")),
        }
    }
}

proptest! {
    #[test]
    fn built_graphs_have_no_orphans(
        count in 2usize..7,
        masks in prop::collection::vec(any::<u32>(), 1..24),
    ) {
        let states: Vec<State> = (0..count).map(|i| State::declared(format!("s{i}"))).collect();
        let mut builder = TransitionMapBuilder::new(states.clone()).unwrap();
        let mut masks = masks.into_iter().cycle();

        let mut step = builder.current_step();
        loop {
            step = match step {
                BuildStep::ChooseDestinations { pool, .. } => {
                    let mask = masks.next().unwrap();
                    builder.answer(pick(&pool, mask)).unwrap()
                }
                BuildStep::ChooseEnterFrom { pool, .. } => {
                    let mut chosen = pick(&pool, masks.next().unwrap());
                    if chosen.is_empty() {
                        chosen.push(pool[0].clone());
                    }
                    builder.answer(chosen).unwrap()
                }
                BuildStep::Complete => break,
            };
        }

        let graph = builder.finish_graph().unwrap();
        for state in &states {
            prop_assert!(!graph.can_enter_from(state).is_empty(), "{} is orphaned", state);
        }
    }

    #[test]
    fn same_state_is_always_rejected(state in cyclic_state(), repeats in 1usize..4) {
        let mut fsm = machine_at(&state);
        let before = fsm.debug_log().len();

        for _ in 0..repeats {
            let outcome = fsm.attempt_transition(state.clone(), Value::Null);
            prop_assert_eq!(outcome.result, TransitionResult::IllegalChangeSameState);
            prop_assert_eq!(fsm.current_state(), &state);
        }
        prop_assert_eq!(fsm.debug_log().len(), before + repeats);
    }

    #[test]
    fn transitions_succeed_exactly_along_edges(from in cyclic_state(), to in cyclic_state()) {
        let graph = cyclic_graph();
        let permitted = graph
            .can_leave_to(&from)
            .map(|destinations| destinations.contains(&to))
            .unwrap_or(false);

        let mut fsm = machine_at(&from);
        let outcome = fsm.attempt_transition(to.clone(), Value::Null);

        prop_assert_eq!(outcome.result == TransitionResult::Success, permitted);
        let expected = if permitted { &to } else { &from };
        prop_assert_eq!(fsm.current_state(), expected);
    }

    #[test]
    fn bounded_log_drops_only_the_oldest(capacity in 1usize..8, extra in 1usize..8) {
        let mut store = DebugLogStore::new(LogCapacity::Bounded(capacity));
        let total = capacity + extra;
        for n in 0..total {
            store.append(record(n));
        }

        let snapshot = store.snapshot();
        prop_assert_eq!(snapshot.len(), capacity);
        prop_assert_eq!(&snapshot[capacity - 1].data, &json!(total - 1));
        prop_assert_eq!(&snapshot[0].data, &json!(total - capacity));
    }

    #[test]
    fn diagram_rendering_is_deterministic(current in cyclic_state(), lr in any::<bool>()) {
        let graph = cyclic_graph();
        let direction = if lr { DiagramDirection::LR } else { DiagramDirection::TB };

        let first = render_state_diagram(
            graph.declared_states(),
            graph.adjacency(),
            &current,
            direction,
        );
        let second = graph.render_diagram(&current, direction);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn diagram_for_cyclic_graph_at_s2() {
    let graph = cyclic_graph();
    let diagram = graph.render_diagram(&State::declared("s2"), DiagramDirection::TB);

    assert_eq!(diagram, CYCLIC_S2_TB);
}

#[test]
fn override_bypasses_adjacency_and_resets_log() {
    let mut fsm = Fsm::new(cyclic_graph(), PartialFsmConfig::default(), Environment::Development);
    fsm.attempt_transition("s1", Value::Null);

    let rejected = fsm.attempt_transition("s3", Value::Null);
    assert_eq!(rejected.result, TransitionResult::IllegalChangeNotAdjacent);

    let outcome = fsm.override_state(StateOverride::new("s3"), true);
    let log = fsm.debug_log();

    assert_eq!(outcome.result, TransitionResult::Override);
    assert_eq!(fsm.current_state(), &State::declared("s3"));
    assert!(log
        .iter()
        .all(|r| matches!(r.result, TransitionResult::Reset | TransitionResult::Override)));
    assert_eq!(log.last().map(|r| r.result), Some(TransitionResult::Override));
}
