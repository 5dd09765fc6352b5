//! Immutable compiled view of an adjacency map.

use super::adjacency::AdjacencyMap;
use super::error::GraphError;
use crate::builder::validate_state_name;
use crate::core::State;
use crate::diagram::{render_state_diagram, DiagramDirection};
use std::collections::HashMap;

/// A validated transition graph with forward and inverse lookup.
///
/// Built once during setup and never mutated. The inverse index
/// (`can_enter_from`) is computed at construction.
///
/// # Example
///
/// ```rust
/// use fsm_graph::core::State;
/// use fsm_graph::graph::StateGraph;
/// use fsm_graph::transition_map;
///
/// let graph = StateGraph::new(
///     ["Idle", "Busy"],
///     transition_map! {
///         Init => [Idle],
///         Idle => [Busy, Terminate],
///         Busy => [Idle],
///     },
/// )
/// .unwrap();
///
/// let idle = State::declared("Idle");
/// assert!(graph.is_decision_state(&idle));
/// assert_eq!(graph.can_enter_from(&idle), &[State::Init, State::declared("Busy")]);
/// ```
#[derive(Clone, Debug)]
pub struct StateGraph {
    declared: Vec<State>,
    adjacency: AdjacencyMap,
    enter_from: HashMap<State, Vec<State>>,
}

impl StateGraph {
    /// Compile a graph, validating names and every structural invariant.
    pub fn new<I, S>(declared: I, adjacency: AdjacencyMap) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        let declared = validate_declared(declared.into_iter().map(Into::into).collect())?;
        validate_edges(&declared, &adjacency)?;

        let mut enter_from: HashMap<State, Vec<State>> = HashMap::new();
        for (source, destinations) in adjacency.iter() {
            for destination in destinations {
                enter_from
                    .entry(destination.clone())
                    .or_default()
                    .push(source.clone());
            }
        }

        Ok(Self {
            declared,
            adjacency,
            enter_from,
        })
    }

    /// States this state may leave to.
    ///
    /// Declared states without an entry and `Terminate` have no exits.
    /// Returns `None` only for states the graph does not know.
    pub fn can_leave_to(&self, state: &State) -> Option<&[State]> {
        if let Some(destinations) = self.adjacency.destinations(state) {
            return Some(destinations);
        }
        if self.knows(state) {
            Some(&[])
        } else {
            None
        }
    }

    /// States that may leave to this state, in source order.
    pub fn can_enter_from(&self, state: &State) -> &[State] {
        self.enter_from
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// A decision state has more than one permitted exit.
    pub fn is_decision_state(&self, state: &State) -> bool {
        self.can_leave_to(state)
            .is_some_and(|destinations| destinations.len() > 1)
    }

    /// Every decision state, `Init` first, then in declared order.
    pub fn decision_states(&self) -> Vec<&State> {
        std::iter::once(&State::Init)
            .chain(self.declared.iter())
            .filter(|state| self.is_decision_state(state))
            .collect()
    }

    /// True for `Init`, `Terminate` and every declared state.
    pub fn knows(&self, state: &State) -> bool {
        state.is_synthetic() || self.is_declared(state)
    }

    pub fn is_declared(&self, state: &State) -> bool {
        self.declared.contains(state)
    }

    pub fn declared_states(&self) -> &[State] {
        &self.declared
    }

    pub fn adjacency(&self) -> &AdjacencyMap {
        &self.adjacency
    }

    /// Render this graph as a state diagram with `current` highlighted.
    pub fn render_diagram(&self, current: &State, direction: DiagramDirection) -> String {
        render_state_diagram(&self.declared, &self.adjacency, current, direction)
    }
}

fn validate_declared(declared: Vec<State>) -> Result<Vec<State>, GraphError> {
    let mut seen: Vec<State> = Vec::with_capacity(declared.len());
    for state in declared {
        let state = validate_state_name(state.name())?;
        if seen.contains(&state) {
            return Err(GraphError::DuplicateState {
                state: state.name().to_string(),
            });
        }
        seen.push(state);
    }
    Ok(seen)
}

fn validate_edges(declared: &[State], adjacency: &AdjacencyMap) -> Result<(), GraphError> {
    for (source, destinations) in adjacency.iter() {
        match source {
            State::Terminate => return Err(GraphError::TerminateAsSource),
            State::Declared(_) if !declared.contains(source) => {
                return Err(GraphError::UnknownSource {
                    state: source.name().to_string(),
                })
            }
            _ => {}
        }

        for destination in destinations {
            match destination {
                State::Init => {
                    return Err(GraphError::InitAsDestination {
                        source_state: source.name().to_string(),
                    })
                }
                State::Declared(_) if !declared.contains(destination) => {
                    return Err(GraphError::UnknownDestination {
                        source_state: source.name().to_string(),
                        destination: destination.name().to_string(),
                    })
                }
                _ => {}
            }
        }
    }

    if adjacency
        .destinations(&State::Init)
        .map_or(true, <[State]>::is_empty)
    {
        return Err(GraphError::InitWithoutDestinations);
    }

    let orphans = adjacency.orphans(declared);
    if !orphans.is_empty() {
        return Err(GraphError::OrphanStates {
            states: orphans.iter().map(|s| s.name().to_string()).collect(),
        });
    }

    Ok(())
}
