//! Running machines.
//!
//! [`TransitionValidator`] holds the current state and decides every
//! request against a [`StateGraph`](crate::graph::StateGraph). [`Fsm`] wraps
//! it with state data, the debug log, configuration and output channels.

mod fsm;
mod outcome;
mod validator;

pub use fsm::Fsm;
pub use outcome::{CurrentState, StateOverride, TransitionOutcome};
pub use validator::{Rejection, TransitionValidator};
