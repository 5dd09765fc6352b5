//! Errors raised while building a transition map.

use crate::graph::GraphError;
use thiserror::Error;

/// Problems with a single proposed state name.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StateNameError {
    #[error("States must be alphanumeric and start with a letter: \"{name}\" is invalid")]
    Malformed { name: String },

    #[error("State \"{name}\" is a reserved state and cannot be used")]
    Reserved { name: String },
}

/// Errors that can occur while building a transition map.
///
/// Every variant except [`BuildError::Aborted`] is recoverable: the builder
/// is left unchanged and the same question can be asked again.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("{} invalid state name(s): {}", .0.len(), join_errors(.0))]
    InvalidStateNames(Vec<StateNameError>),

    #[error("State \"{state}\" is declared more than once")]
    DuplicateState { state: String },

    #[error("You must specify two or more states (found {found})")]
    TooFewStates { found: usize },

    #[error("\"{state}\" is not one of the states offered for \"{asked_for}\"")]
    SelectionOutsidePool { state: String, asked_for: String },

    #[error("Please select at least one state that leaves to \"{orphan}\"")]
    EmptyEnterFromSelection { orphan: String },

    #[error("The transition map is not complete yet")]
    BuildIncomplete,

    #[error("Transition map building was aborted")]
    Aborted,

    #[error(transparent)]
    Graph(#[from] GraphError),
}

fn join_errors(errors: &[StateNameError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
