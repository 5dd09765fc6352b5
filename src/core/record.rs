//! Transition records written to the debug log.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// What kind of operation produced a record.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    /// The implicit entry into `Init` at construction.
    Init,
    /// A validated change to another state.
    Change,
    /// A data update that keeps the current state.
    Update,
    /// A transition that bypassed adjacency checks.
    Override,
    /// The debug log was cleared ahead of an override.
    Reset,
}

/// Outcome of a transition attempt.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionResult {
    Success,
    RepeatUpdateFiltered,
    IllegalChangeSameState,
    IllegalChangeNotAdjacent,
    UnknownError,
    InternalError,
    Override,
    Reset,
}

impl TransitionResult {
    /// The wire name, as it appears in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionResult::Success => "success",
            TransitionResult::RepeatUpdateFiltered => "repeat_update_filtered",
            TransitionResult::IllegalChangeSameState => "illegal_change_same_state",
            TransitionResult::IllegalChangeNotAdjacent => "illegal_change_not_adjacent",
            TransitionResult::UnknownError => "unknown_error",
            TransitionResult::InternalError => "internal_error",
            TransitionResult::Override => "override",
            TransitionResult::Reset => "reset",
        }
    }

    /// True when the machine moved (or accepted the update).
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionResult::Success | TransitionResult::Override)
    }

    /// True for results that indicate an illegal request.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TransitionResult::IllegalChangeSameState
                | TransitionResult::IllegalChangeNotAdjacent
                | TransitionResult::UnknownError
                | TransitionResult::InternalError
        )
    }
}

impl fmt::Display for TransitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of a single transition attempt.
///
/// Records are immutable once appended to the log. The timestamp serializes
/// as epoch milliseconds and `from_state` is `null` for the `init` record.
///
/// # Example
///
/// ```rust
/// use fsm_graph::core::{State, TransitionRecord, TransitionResult, TransitionType};
/// use serde_json::Value;
///
/// let record = TransitionRecord::new(
///     Some(State::Init),
///     State::declared("Loading"),
///     TransitionType::Change,
///     TransitionResult::Success,
///     "success",
///     Value::Null,
/// );
///
/// let json = serde_json::to_value(&record).unwrap();
/// assert_eq!(json["toState"], "Loading");
/// assert_eq!(json["transitionType"], "change");
/// assert!(json["timestamp"].is_i64());
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRecord {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub from_state: Option<State>,
    pub to_state: State,
    pub transition_type: TransitionType,
    pub result: TransitionResult,
    pub message: String,
    pub data: Value,
}

impl TransitionRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        from_state: Option<State>,
        to_state: State,
        transition_type: TransitionType,
        result: TransitionResult,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            from_state,
            to_state,
            transition_type,
            result,
            message: message.into(),
            data,
        }
    }

    /// Timestamp as epoch milliseconds.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}
