//! Fsm Graph: graph-checked finite state machines with debugging instrumentation
//!
//! A machine's legal transitions are declared up front as a directed graph.
//! Every request to change state is checked against that graph, and every
//! attempt, legal or not, lands in a bounded debug log. A running machine can
//! publish its current state, its log and a Mermaid diagram of the graph to
//! subscribers.
//!
//! # Core Concepts
//!
//! - **State**: `Init`, the declared states, and `Terminate`
//! - **Graph**: an ordered adjacency map validated to have no orphan states
//! - **Builder**: an interactive, resumable way to author a valid map
//! - **Machine**: the validator plus log, configuration and output channels
//!
//! # Example
//!
//! ```rust
//! use fsm_graph::config::{Environment, PartialFsmConfig};
//! use fsm_graph::core::TransitionResult;
//! use fsm_graph::graph::StateGraph;
//! use fsm_graph::machine::{Fsm, StateOverride};
//! use fsm_graph::transition_map;
//! use serde_json::json;
//!
//! let graph = StateGraph::new(
//!     ["s1", "s2", "s3"],
//!     transition_map! {
//!         Init => [s1],
//!         s1 => [s2],
//!         s2 => [s3],
//!         s3 => [s1],
//!     },
//! )
//! .unwrap();
//!
//! let mut fsm = Fsm::new(graph, PartialFsmConfig::default(), Environment::Development);
//! fsm.attempt_transition("s1", json!({ "step": 1 }));
//!
//! let outcome = fsm.attempt_transition("s3", json!(null));
//! assert_eq!(outcome.result, TransitionResult::IllegalChangeNotAdjacent);
//!
//! let outcome = fsm.override_state(StateOverride::new("s3"), true);
//! assert_eq!(outcome.result, TransitionResult::Override);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod diagram;
pub mod graph;
pub mod log;
pub mod machine;
pub mod observe;

// Re-export commonly used types
pub use builder::{
    build_transition_map, Answer, BuildError, SelectionProvider, TransitionMapBuilder,
};
pub use config::{resolve_config, Environment, FsmConfig, PartialFsmConfig};
pub use crate::core::{State, TransitionRecord, TransitionResult, TransitionType};
pub use graph::{AdjacencyMap, GraphError, StateGraph};
pub use machine::{Fsm, StateOverride, TransitionOutcome};
