//! Errors raised while compiling a transition graph.

use crate::builder::StateNameError;
use thiserror::Error;

/// Structural problems that prevent an adjacency map from becoming a graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    InvalidStateName(#[from] StateNameError),

    #[error("State \"{state}\" is declared more than once")]
    DuplicateState { state: String },

    #[error("Transition source \"{state}\" is not a declared state")]
    UnknownSource { state: String },

    #[error("\"{source_state}\" leaves to \"{destination}\", which is not a declared state")]
    UnknownDestination {
        source_state: String,
        destination: String,
    },

    #[error("Terminate is a final state and cannot be a transition source")]
    TerminateAsSource,

    #[error("\"{source_state}\" cannot leave to Init")]
    InitAsDestination { source_state: String },

    #[error("Init must leave to at least one state")]
    InitWithoutDestinations,

    #[error("No states leave to {}", .states.join(", "))]
    OrphanStates { states: Vec<String> },
}
