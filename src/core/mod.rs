//! Core state machine types.
//!
//! This module contains the values shared by every other layer:
//! - State identifiers, including the synthetic `Init` and `Terminate` states
//! - Transition records with their type and result taxonomy
//!
//! Everything here is plain data with no side effects.

mod record;
mod state;

pub use record::{TransitionRecord, TransitionResult, TransitionType};
pub use state::{State, INIT, TERMINATE};
