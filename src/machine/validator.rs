//! The transition-validation core.

use crate::core::{State, TransitionResult};
use crate::graph::StateGraph;

/// Why a request was refused.
#[derive(Clone, PartialEq, Debug)]
pub struct Rejection {
    pub result: TransitionResult,
    pub message: String,
}

impl Rejection {
    fn new(result: TransitionResult, message: String) -> Self {
        Self { result, message }
    }
}

/// Holds the current state and enforces the graph on every change.
///
/// Mutation requires `&mut self`, so only one transition can be in progress
/// against an instance at a time. The machine always starts in `Init`.
///
/// # Example
///
/// ```rust
/// use fsm_graph::core::{State, TransitionResult};
/// use fsm_graph::graph::StateGraph;
/// use fsm_graph::machine::TransitionValidator;
/// use fsm_graph::transition_map;
///
/// let graph = StateGraph::new(
///     ["Idle", "Busy"],
///     transition_map! {
///         Init => [Idle],
///         Idle => [Busy],
///         Busy => [Idle],
///     },
/// )
/// .unwrap();
/// let mut validator = TransitionValidator::new(graph);
///
/// let rejection = validator.apply(State::declared("Busy")).unwrap_err();
/// assert_eq!(rejection.result, TransitionResult::IllegalChangeNotAdjacent);
///
/// validator.apply(State::declared("Idle")).unwrap();
/// assert_eq!(validator.current(), &State::declared("Idle"));
/// ```
#[derive(Clone, Debug)]
pub struct TransitionValidator {
    graph: StateGraph,
    current: State,
}

impl TransitionValidator {
    pub fn new(graph: StateGraph) -> Self {
        Self {
            graph,
            current: State::Init,
        }
    }

    #[cfg(test)]
    pub(crate) fn resume_at(graph: StateGraph, current: State) -> Self {
        Self { graph, current }
    }

    pub fn current(&self) -> &State {
        &self.current
    }

    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    /// Decide whether the machine may move from the current state to
    /// `target`, without moving it.
    ///
    /// Checks run in order: same state, unknown target, graph consistency,
    /// adjacency.
    pub fn check(&self, target: &State) -> Result<(), Rejection> {
        let current = &self.current;

        if target == current {
            return Err(Rejection::new(
                TransitionResult::IllegalChangeSameState,
                format!(
                    "Cannot change from \"{current}\" to \"{target}\": already in \"{current}\""
                ),
            ));
        }

        if !self.is_valid_target(target) {
            return Err(unknown_target(target));
        }

        let Some(destinations) = self.graph.can_leave_to(current) else {
            return Err(Rejection::new(
                TransitionResult::InternalError,
                format!("Current state \"{current}\" is missing from the transition graph"),
            ));
        };

        if !destinations.contains(target) {
            return Err(Rejection::new(
                TransitionResult::IllegalChangeNotAdjacent,
                format!(
                    "Cannot change from \"{current}\" to \"{target}\": \"{current}\" can only \
                     leave to {}",
                    describe(destinations)
                ),
            ));
        }

        Ok(())
    }

    /// Move to `target` if the graph allows it. Returns the previous state.
    pub fn apply(&mut self, target: State) -> Result<State, Rejection> {
        self.check(&target)?;
        Ok(std::mem::replace(&mut self.current, target))
    }

    /// Move to any state the graph knows, ignoring adjacency. Returns the
    /// previous state.
    pub fn force(&mut self, target: State) -> Result<State, Rejection> {
        if !self.graph.knows(&target) {
            return Err(unknown_target(&target));
        }
        Ok(std::mem::replace(&mut self.current, target))
    }

    fn is_valid_target(&self, target: &State) -> bool {
        matches!(target, State::Terminate) || self.graph.is_declared(target)
    }
}

fn unknown_target(target: &State) -> Rejection {
    Rejection::new(
        TransitionResult::UnknownError,
        format!("\"{target}\" is not a state of this machine"),
    )
}

fn describe(destinations: &[State]) -> String {
    if destinations.is_empty() {
        return "no other state".to_string();
    }
    let names: Vec<&str> = destinations.iter().map(State::name).collect();
    format!("[{}]", names.join(", "))
}
