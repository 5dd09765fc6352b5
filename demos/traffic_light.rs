//! Traffic Light State Machine
//!
//! This example drives a cyclic machine and prints what the debugging
//! channels publish along the way.
//!
//! Key concepts:
//! - Declaring a graph with `transition_map!`
//! - Legal, illegal and overridden transitions
//! - Debug log rows and the Mermaid diagram
//!
//! Run with: cargo run --example traffic_light

use fsm_graph::config::{Environment, PartialFsmConfig};
use fsm_graph::graph::StateGraph;
use fsm_graph::log::present_debug_log;
use fsm_graph::machine::{Fsm, StateOverride};
use fsm_graph::transition_map;
use serde_json::json;

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let graph = StateGraph::new(
        ["Red", "Green", "Yellow"],
        transition_map! {
            Init => [Red],
            Red => [Green],
            Green => [Yellow],
            Yellow => [Red, Terminate],
        },
    )
    .unwrap();

    let mut fsm = Fsm::new(graph, PartialFsmConfig::default(), Environment::from_env());
    fsm.subscribe_current_state(|current| {
        println!("  now {} with {}", current.state, current.data);
    });

    println!("Transition sequence:");
    for (light, seconds) in [("Red", 30), ("Green", 25), ("Yellow", 5)] {
        fsm.attempt_transition(light, json!({ "seconds": seconds }));
    }

    println!("\nYellow cannot go straight to Green:");
    let outcome = fsm.attempt_transition("Green", json!(null));
    println!("  {}: {}", outcome.result, outcome.message);

    println!("\nAn override ignores the graph:");
    let outcome = fsm.override_state(StateOverride::new("Green"), false);
    println!("  {} -> {}", outcome.result, outcome.state);

    println!("\nDebug log (newest first):");
    for row in present_debug_log(&fsm.debug_log(), &["seconds"]) {
        println!("  {} {:?} {} [{:?}]", row.time, row.transition_type, row.state, row.category);
    }

    if let Some(diagram) = fsm.diagram_definition() {
        println!("\nDiagram:\n{diagram}");
    }

    fsm.destroy();
    println!("\n=== Example Complete ===");
}
