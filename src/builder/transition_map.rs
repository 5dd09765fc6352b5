//! Resumable construction of an orphan-free adjacency map.

use crate::builder::error::BuildError;
use crate::builder::names::validate_state_name;
use crate::core::State;
use crate::graph::{AdjacencyMap, StateGraph};

/// The question the builder needs answered next.
#[derive(Clone, PartialEq, Debug)]
pub enum BuildStep {
    /// Which states may `source` leave to? An empty answer selects every
    /// other declared state.
    ChooseDestinations { source: State, pool: Vec<State> },
    /// Which states should leave to `orphan`? The answer must be non-empty.
    ChooseEnterFrom { orphan: State, pool: Vec<State> },
    /// The map is complete and can be finished.
    Complete,
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Phase {
    Destinations { next: usize },
    Orphans { next: usize },
    Done,
}

/// Builds an [`AdjacencyMap`] one answer at a time.
///
/// Sources are visited in the order `Init`, then the declared states. Once
/// every source has destinations, declared states that nothing leaves to are
/// visited in declared order and the caller picks states to extend. The map
/// cannot be finished while any state is orphaned.
///
/// A rejected answer leaves the builder unchanged, so the caller simply asks
/// the same question again.
///
/// # Example
///
/// ```rust
/// use fsm_graph::builder::{BuildStep, TransitionMapBuilder};
/// use fsm_graph::core::State;
///
/// let idle = State::declared("Idle");
/// let busy = State::declared("Busy");
/// let mut builder = TransitionMapBuilder::new(vec![idle.clone(), busy.clone()]).unwrap();
///
/// builder.answer(vec![idle.clone()]).unwrap(); // Init -> Idle
/// builder.answer(vec![State::Terminate]).unwrap(); // Idle -> Terminate
/// let step = builder.answer(vec![idle.clone()]).unwrap(); // Busy -> Idle
///
/// // Nothing leaves to Busy yet.
/// assert!(matches!(step, BuildStep::ChooseEnterFrom { ref orphan, .. } if *orphan == busy));
/// assert_eq!(builder.answer(vec![idle.clone()]).unwrap(), BuildStep::Complete);
///
/// let map = builder.finish().unwrap();
/// assert_eq!(map.destinations(&idle), Some(&[State::Terminate, busy][..]));
/// ```
#[derive(Clone, Debug)]
pub struct TransitionMapBuilder {
    states: Vec<State>,
    map: AdjacencyMap,
    phase: Phase,
}

impl TransitionMapBuilder {
    /// Start building for an already validated list of unique states.
    pub fn new(states: Vec<State>) -> Result<Self, BuildError> {
        if states.len() < 2 {
            return Err(BuildError::TooFewStates {
                found: states.len(),
            });
        }
        for (i, state) in states.iter().enumerate() {
            validate_state_name(state.name())
                .map_err(|error| BuildError::InvalidStateNames(vec![error]))?;
            if states[..i].contains(state) {
                return Err(BuildError::DuplicateState {
                    state: state.name().to_string(),
                });
            }
        }

        Ok(Self {
            states,
            map: AdjacencyMap::new(),
            phase: Phase::Destinations { next: 0 },
        })
    }

    /// Declared states, in declaration order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The map as assembled so far.
    pub fn partial_map(&self) -> &AdjacencyMap {
        &self.map
    }

    /// The question that the next call to [`answer`](Self::answer) resolves.
    pub fn current_step(&self) -> BuildStep {
        match self.phase {
            Phase::Destinations { next } => {
                let source = self.source_at(next);
                let pool = self.destination_pool(&source);
                BuildStep::ChooseDestinations { source, pool }
            }
            Phase::Orphans { next } => {
                let orphan = self.states[next].clone();
                let pool = self.enter_from_pool(&orphan);
                BuildStep::ChooseEnterFrom { orphan, pool }
            }
            Phase::Done => BuildStep::Complete,
        }
    }

    /// Answer the current question and advance.
    pub fn answer(&mut self, selection: Vec<State>) -> Result<BuildStep, BuildError> {
        match self.phase {
            Phase::Destinations { next } => {
                let source = self.source_at(next);
                let pool = self.destination_pool(&source);
                check_within_pool(&selection, &pool, &source)?;

                let destinations = if selection.is_empty() {
                    self.other_states(&source)
                } else {
                    selection
                };
                tracing::debug!(
                    source = %source,
                    destinations = destinations.len(),
                    "Recorded destinations"
                );
                self.map.set_destinations(source, destinations);

                self.phase = if next < self.states.len() {
                    Phase::Destinations { next: next + 1 }
                } else {
                    self.next_orphan_phase(0)
                };
            }
            Phase::Orphans { next } => {
                let orphan = self.states[next].clone();
                if selection.is_empty() {
                    tracing::warn!(state = %orphan, "No states leave to this state");
                    return Err(BuildError::EmptyEnterFromSelection {
                        orphan: orphan.name().to_string(),
                    });
                }
                let pool = self.enter_from_pool(&orphan);
                check_within_pool(&selection, &pool, &orphan)?;

                for source in &selection {
                    self.map.add_destination(source, orphan.clone());
                }
                tracing::debug!(state = %orphan, sources = selection.len(), "Resolved orphan");

                self.phase = self.next_orphan_phase(next + 1);
            }
            Phase::Done => {}
        }
        Ok(self.current_step())
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Take the finished map.
    pub fn finish(self) -> Result<AdjacencyMap, BuildError> {
        if !self.is_complete() {
            return Err(BuildError::BuildIncomplete);
        }
        Ok(self.map)
    }

    /// Take the finished map compiled into a [`StateGraph`].
    pub fn finish_graph(self) -> Result<StateGraph, BuildError> {
        let states = self.states.clone();
        let map = self.finish()?;
        Ok(StateGraph::new(states, map)?)
    }

    fn source_at(&self, index: usize) -> State {
        if index == 0 {
            State::Init
        } else {
            self.states[index - 1].clone()
        }
    }

    fn other_states(&self, state: &State) -> Vec<State> {
        self.states.iter().filter(|s| *s != state).cloned().collect()
    }

    fn destination_pool(&self, source: &State) -> Vec<State> {
        let mut pool = self.other_states(source);
        if *source != State::Init {
            pool.push(State::Terminate);
        }
        pool
    }

    fn enter_from_pool(&self, orphan: &State) -> Vec<State> {
        let mut pool = self.other_states(orphan);
        pool.push(State::Init);
        pool
    }

    fn next_orphan_phase(&self, from: usize) -> Phase {
        self.states
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, state)| !self.map.is_destination(state))
            .map_or(Phase::Done, |(next, _)| Phase::Orphans { next })
    }
}

fn check_within_pool(
    selection: &[State],
    pool: &[State],
    asked_for: &State,
) -> Result<(), BuildError> {
    match selection.iter().find(|state| !pool.contains(state)) {
        Some(stray) => Err(BuildError::SelectionOutsidePool {
            state: stray.name().to_string(),
            asked_for: asked_for.name().to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> State {
        State::from(name)
    }

    fn three() -> TransitionMapBuilder {
        TransitionMapBuilder::new(vec![s("a"), s("b"), s("c")]).unwrap()
    }

    #[test]
    fn asks_init_first_without_terminate() {
        let builder = three();
        assert_eq!(
            builder.current_step(),
            BuildStep::ChooseDestinations {
                source: State::Init,
                pool: vec![s("a"), s("b"), s("c")],
            }
        );
    }

    #[test]
    fn declared_sources_may_choose_terminate() {
        let mut builder = three();
        let step = builder.answer(vec![s("a")]).unwrap();
        assert_eq!(
            step,
            BuildStep::ChooseDestinations {
                source: s("a"),
                pool: vec![s("b"), s("c"), State::Terminate],
            }
        );
    }

    #[test]
    fn empty_selection_defaults_to_every_other_state() {
        let mut builder = three();
        builder.answer(vec![]).unwrap();
        builder.answer(vec![]).unwrap();
        builder.answer(vec![]).unwrap();
        assert_eq!(builder.answer(vec![]).unwrap(), BuildStep::Complete);

        let map = builder.finish().unwrap();
        assert_eq!(
            map.destinations(&State::Init),
            Some(&[s("a"), s("b"), s("c")][..])
        );
        assert_eq!(map.destinations(&s("b")), Some(&[s("a"), s("c")][..]));
    }

    #[test]
    fn selection_outside_pool_leaves_builder_unchanged() {
        let mut builder = three();
        let before = builder.current_step();

        let error = builder.answer(vec![State::Terminate]).unwrap_err();
        assert!(matches!(error, BuildError::SelectionOutsidePool { .. }));
        assert_eq!(builder.current_step(), before);

        let error = builder.answer(vec![s("zzz")]).unwrap_err();
        assert!(matches!(error, BuildError::SelectionOutsidePool { .. }));
    }

    #[test]
    fn orphans_are_visited_in_declared_order() {
        let mut builder = three();
        builder.answer(vec![s("a")]).unwrap();
        builder.answer(vec![State::Terminate]).unwrap();
        builder.answer(vec![s("a")]).unwrap();
        let step = builder.answer(vec![s("a")]).unwrap();

        assert_eq!(
            step,
            BuildStep::ChooseEnterFrom {
                orphan: s("b"),
                pool: vec![s("a"), s("c"), State::Init],
            }
        );

        let step = builder.answer(vec![State::Init, s("a")]).unwrap();
        assert!(matches!(step, BuildStep::ChooseEnterFrom { ref orphan, .. } if *orphan == s("c")));
    }

    #[test]
    fn empty_enter_from_is_asked_again() {
        let mut builder = three();
        builder.answer(vec![s("a")]).unwrap();
        builder.answer(vec![State::Terminate]).unwrap();
        builder.answer(vec![s("a")]).unwrap();
        builder.answer(vec![s("a")]).unwrap();

        let error = builder.answer(vec![]).unwrap_err();
        assert_eq!(
            error,
            BuildError::EmptyEnterFromSelection {
                orphan: "b".to_string()
            }
        );
        assert!(matches!(
            builder.current_step(),
            BuildStep::ChooseEnterFrom { ref orphan, .. } if *orphan == s("b")
        ));
    }

    #[test]
    fn resolving_orphans_appends_to_sources() {
        let mut builder = three();
        builder.answer(vec![s("a")]).unwrap();
        builder.answer(vec![State::Terminate]).unwrap();
        builder.answer(vec![s("a")]).unwrap();
        builder.answer(vec![s("a")]).unwrap();
        builder.answer(vec![s("a")]).unwrap();
        assert_eq!(builder.answer(vec![s("b")]).unwrap(), BuildStep::Complete);

        let graph = builder.finish_graph().unwrap();
        let map = graph.adjacency();
        assert_eq!(map.destinations(&s("a")), Some(&[State::Terminate, s("b")][..]));
        assert_eq!(map.destinations(&s("b")), Some(&[s("a"), s("c")][..]));
        assert!(graph.knows(&s("c")));
    }

    #[test]
    fn finish_before_complete_fails() {
        let builder = three();
        assert_eq!(builder.finish().unwrap_err(), BuildError::BuildIncomplete);
    }

    #[test]
    fn rejects_bad_state_lists() {
        assert!(matches!(
            TransitionMapBuilder::new(vec![s("a")]),
            Err(BuildError::TooFewStates { found: 1 })
        ));
        assert!(matches!(
            TransitionMapBuilder::new(vec![s("a"), State::Init]),
            Err(BuildError::InvalidStateNames(_))
        ));
        assert_eq!(
            TransitionMapBuilder::new(vec![s("a"), s("a")]).unwrap_err(),
            BuildError::DuplicateState {
                state: "a".to_string()
            }
        );
        assert!(matches!(
            TransitionMapBuilder::new(vec![s("a"), s("b c")]),
            Err(BuildError::InvalidStateNames(_))
        ));
    }
}
