//! State name validation.

use crate::builder::error::{BuildError, StateNameError};
use crate::core::{State, INIT, TERMINATE};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Validate one state name and turn it into a declared state.
///
/// Names must match `^[A-Za-z][A-Za-z0-9_-]*$` and must not equal `Init` or
/// `Terminate`, ignoring case.
///
/// # Example
///
/// ```rust
/// use fsm_graph::builder::{validate_state_name, StateNameError};
/// use fsm_graph::core::State;
///
/// assert_eq!(validate_state_name("Loading"), Ok(State::declared("Loading")));
/// assert!(matches!(
///     validate_state_name("terminate"),
///     Err(StateNameError::Reserved { .. })
/// ));
/// ```
pub fn validate_state_name(name: &str) -> Result<State, StateNameError> {
    let mut chars = name.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if !well_formed {
        return Err(StateNameError::Malformed {
            name: name.to_string(),
        });
    }

    if name.eq_ignore_ascii_case(INIT) || name.eq_ignore_ascii_case(TERMINATE) {
        return Err(StateNameError::Reserved {
            name: name.to_string(),
        });
    }

    Ok(State::declared(name))
}

fn check_name(name: &str) -> Validation<(), NonEmptyVec<StateNameError>> {
    match validate_state_name(name) {
        Ok(_) => Validation::success(()),
        Err(error) => Validation::fail(error),
    }
}

/// Parse a whitespace-separated list of state names.
///
/// Every invalid name is reported at once rather than stopping at the first.
/// Duplicates are dropped, keeping the first occurrence, and at least two
/// distinct states are required.
///
/// # Example
///
/// ```rust
/// use fsm_graph::builder::{parse_state_list, BuildError};
/// use fsm_graph::core::State;
///
/// let states = parse_state_list("Idle Busy Idle").unwrap();
/// assert_eq!(states, vec![State::declared("Idle"), State::declared("Busy")]);
///
/// match parse_state_list("Idle 2fast Init") {
///     Err(BuildError::InvalidStateNames(errors)) => assert_eq!(errors.len(), 2),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub fn parse_state_list(raw: &str) -> Result<Vec<State>, BuildError> {
    let names: Vec<&str> = raw.split_whitespace().collect();

    let checks: Vec<Validation<(), NonEmptyVec<StateNameError>>> =
        names.iter().map(|name| check_name(name)).collect();

    if let Validation::Failure(errors) = Validation::all_vec(checks) {
        return Err(BuildError::InvalidStateNames(
            errors.iter().cloned().collect(),
        ));
    }

    let mut states: Vec<State> = Vec::with_capacity(names.len());
    for name in names {
        let state = State::declared(name);
        if !states.contains(&state) {
            states.push(state);
        }
    }

    if states.len() < 2 {
        return Err(BuildError::TooFewStates {
            found: states.len(),
        });
    }

    Ok(states)
}
