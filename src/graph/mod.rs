//! Transition graphs.
//!
//! An [`AdjacencyMap`] is the raw, ordered declaration of permitted edges.
//! A [`StateGraph`] is the validated, immutable form the runtime enforces.

mod adjacency;
mod error;
mod state_graph;

pub use adjacency::AdjacencyMap;
pub use error::GraphError;
pub use state_graph::StateGraph;
