//! Building a transition map from declared states and host answers.
//!
//! The host owns all I/O. It hands the builder a list of state names and
//! answers one question at a time, either by driving a
//! [`TransitionMapBuilder`] directly or by implementing [`SelectionProvider`]
//! and calling [`build_transition_map`].

pub mod error;
pub mod names;
pub mod transition_map;

pub use error::{BuildError, StateNameError};
pub use names::{parse_state_list, validate_state_name};
pub use transition_map::{BuildStep, TransitionMapBuilder};

use crate::core::State;
use crate::graph::AdjacencyMap;

/// An answer supplied by the host for one builder question.
#[derive(Clone, PartialEq, Debug)]
pub enum Answer {
    Selected(Vec<State>),
    /// The person cancelled. The host decides whether to exit.
    Aborted,
}

/// Source of answers for the builder, typically an interactive prompt.
pub trait SelectionProvider {
    /// Answer for "which states may `source` leave to?".
    fn choose_destinations(&mut self, source: &State, pool: &[State]) -> Answer;

    /// Answer for "which states should leave to `orphan`?".
    fn choose_enter_from(&mut self, orphan: &State, pool: &[State]) -> Answer;

    /// Called when an answer was rejected, before the same question is asked
    /// again.
    fn rejected(&mut self, _error: &BuildError) {}
}

/// Drive a [`TransitionMapBuilder`] to completion against a provider.
///
/// Rejected answers are reported to the provider and the question is asked
/// again. Cancellation is returned as [`BuildError::Aborted`].
///
/// # Example
///
/// ```
/// use fsm_graph::builder::{build_transition_map, parse_state_list, Answer, SelectionProvider};
/// use fsm_graph::core::State;
///
/// struct AcceptDefaults;
///
/// impl SelectionProvider for AcceptDefaults {
///     fn choose_destinations(&mut self, _source: &State, _pool: &[State]) -> Answer {
///         Answer::Selected(vec![])
///     }
///
///     fn choose_enter_from(&mut self, _orphan: &State, pool: &[State]) -> Answer {
///         Answer::Selected(pool[..1].to_vec())
///     }
/// }
///
/// let states = parse_state_list("Idle Busy").unwrap();
/// let map = build_transition_map(states, &mut AcceptDefaults).unwrap();
/// assert_eq!(
///     map.destinations(&State::Init),
///     Some(&[State::declared("Idle"), State::declared("Busy")][..])
/// );
/// ```
pub fn build_transition_map<P>(
    states: Vec<State>,
    provider: &mut P,
) -> Result<AdjacencyMap, BuildError>
where
    P: SelectionProvider + ?Sized,
{
    let mut builder = TransitionMapBuilder::new(states)?;

    loop {
        let answer = match builder.current_step() {
            BuildStep::ChooseDestinations { source, pool } => {
                provider.choose_destinations(&source, &pool)
            }
            BuildStep::ChooseEnterFrom { orphan, pool } => {
                provider.choose_enter_from(&orphan, &pool)
            }
            BuildStep::Complete => return builder.finish(),
        };

        let Answer::Selected(selection) = answer else {
            tracing::info!("Transition map building aborted by the host");
            return Err(BuildError::Aborted);
        };

        if let Err(error) = builder.answer(selection) {
            provider.rejected(&error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted {
        answers: VecDeque<Answer>,
        rejections: Vec<BuildError>,
    }

    impl Scripted {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                rejections: Vec::new(),
            }
        }

        fn next(&mut self) -> Answer {
            self.answers.pop_front().unwrap_or(Answer::Aborted)
        }
    }

    impl SelectionProvider for Scripted {
        fn choose_destinations(&mut self, _source: &State, _pool: &[State]) -> Answer {
            self.next()
        }

        fn choose_enter_from(&mut self, _orphan: &State, _pool: &[State]) -> Answer {
            self.next()
        }

        fn rejected(&mut self, error: &BuildError) {
            self.rejections.push(error.clone());
        }
    }

    fn pick(names: &[&str]) -> Answer {
        Answer::Selected(names.iter().map(|n| State::from(*n)).collect())
    }

    #[test]
    fn provider_drives_build_to_completion() {
        let mut provider = Scripted::new(vec![
            pick(&["a"]),
            pick(&["Terminate"]),
            pick(&["a"]),
            pick(&[]),
            pick(&["a"]),
        ]);

        let map = build_transition_map(vec![State::from("a"), State::from("b")], &mut provider)
            .unwrap();

        assert_eq!(
            map.destinations(&State::from("a")),
            Some(&[State::Terminate, State::from("b")][..])
        );
        assert_eq!(provider.rejections.len(), 1);
        assert!(matches!(
            provider.rejections[0],
            BuildError::EmptyEnterFromSelection { .. }
        ));
    }

    #[test]
    fn abort_is_returned_to_host() {
        let mut provider = Scripted::new(vec![pick(&["a"]), Answer::Aborted]);
        let result = build_transition_map(vec![State::from("a"), State::from("b")], &mut provider);
        assert_eq!(result.unwrap_err(), BuildError::Aborted);
    }

    #[test]
    fn invalid_state_list_fails_before_prompting() {
        let mut provider = Scripted::new(vec![]);
        let result = build_transition_map(vec![State::from("a")], &mut provider);
        assert_eq!(result.unwrap_err(), BuildError::TooFewStates { found: 1 });
    }
}
