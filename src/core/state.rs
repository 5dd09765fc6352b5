//! State identifiers for graph-defined state machines.
//!
//! States are runtime values: the declared states come from a host at setup
//! time, and two synthetic states bracket every machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic start state.
pub const INIT: &str = "Init";

/// Name of the synthetic end state.
pub const TERMINATE: &str = "Terminate";

/// A state machine state.
///
/// `Init` is the sole source of the initial transition and `Terminate` is a
/// destination that never has outgoing edges. Every other state is declared
/// by name. States serialize as their plain name.
///
/// # Example
///
/// ```rust
/// use fsm_graph::core::State;
///
/// assert_eq!(State::from("Init"), State::Init);
/// assert_eq!(State::from("Terminate"), State::Terminate);
/// assert_eq!(State::from("Loading"), State::declared("Loading"));
/// assert_eq!(State::declared("Loading").name(), "Loading");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum State {
    Init,
    Declared(String),
    Terminate,
}

impl State {
    /// Create a declared state. The name is not validated here.
    pub fn declared(name: impl Into<String>) -> Self {
        State::Declared(name.into())
    }

    /// Get the state's name for display/logging.
    pub fn name(&self) -> &str {
        match self {
            State::Init => INIT,
            State::Declared(name) => name,
            State::Terminate => TERMINATE,
        }
    }

    /// Check if this is one of the two synthetic states.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, State::Init | State::Terminate)
    }

    /// Check if this is the terminal state.
    pub fn is_final(&self) -> bool {
        matches!(self, State::Terminate)
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        match name {
            INIT => State::Init,
            TERMINATE => State::Terminate,
            other => State::Declared(other.to_string()),
        }
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        match name.as_str() {
            INIT => State::Init,
            TERMINATE => State::Terminate,
            _ => State::Declared(name),
        }
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        match state {
            State::Declared(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(State::Init.name(), "Init");
        assert_eq!(State::Terminate.name(), "Terminate");
        assert_eq!(State::declared("Loading").name(), "Loading");
    }

    #[test]
    fn reserved_names_map_to_synthetic_states() {
        assert_eq!(State::from("Init"), State::Init);
        assert_eq!(State::from("Terminate".to_string()), State::Terminate);
        assert_eq!(State::from("init"), State::declared("init"));
    }

    #[test]
    fn synthetic_states_are_identified() {
        assert!(State::Init.is_synthetic());
        assert!(State::Terminate.is_synthetic());
        assert!(!State::declared("Busy").is_synthetic());
        assert!(State::Terminate.is_final());
        assert!(!State::Init.is_final());
    }

    #[test]
    fn state_serializes_as_plain_name() {
        let json = serde_json::to_string(&State::declared("Busy")).unwrap();
        assert_eq!(json, "\"Busy\"");

        let init: State = serde_json::from_str("\"Init\"").unwrap();
        assert_eq!(init, State::Init);

        let json = serde_json::to_string(&State::Terminate).unwrap();
        assert_eq!(json, "\"Terminate\"");
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(State::declared("Idle").to_string(), "Idle");
        assert_eq!(format!("{}", State::Init), "Init");
    }
}
