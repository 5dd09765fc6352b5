//! Values exchanged with the host when driving a machine.

use crate::core::{State, TransitionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The state to force a machine into, bypassing adjacency checks.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct StateOverride {
    pub state: State,
    #[serde(default)]
    pub data: Value,
}

impl StateOverride {
    pub fn new(state: impl Into<State>) -> Self {
        Self {
            state: state.into(),
            data: Value::Null,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// The machine's current state and its data, as sent to subscribers.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CurrentState {
    pub state: State,
    pub data: Value,
}

/// What happened to a transition request.
///
/// Invalid requests are reported here rather than as errors, so a caller's
/// control flow is never interrupted by a bad transition.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub result: TransitionResult,
    /// The current state after the request was handled.
    pub state: State,
    pub message: String,
}

impl TransitionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_applied()
    }
}
