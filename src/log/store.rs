//! Bounded, append-only storage for transition records.

use crate::core::TransitionRecord;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of records a [`DebugLogStore`] retains.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCapacity {
    /// Never evict.
    #[default]
    Unbounded,
    /// Keep at most this many records. Zero keeps the store empty.
    Bounded(usize),
}

impl LogCapacity {
    fn admits(&self, len: usize) -> bool {
        match self {
            LogCapacity::Unbounded => true,
            LogCapacity::Bounded(max) => len <= *max,
        }
    }
}


/// Ordered log of transition records with FIFO eviction.
///
/// Records are kept oldest first. Appending past capacity evicts from the
/// front until the log fits again.
///
/// # Example
///
/// ```rust
/// use fsm_graph::core::{State, TransitionRecord, TransitionResult, TransitionType};
/// use fsm_graph::log::{DebugLogStore, LogCapacity};
/// use serde_json::Value;
///
/// let mut store = DebugLogStore::new(LogCapacity::Bounded(2));
///
/// for name in ["a", "b", "c"] {
///     store.append(TransitionRecord::new(
///         None,
///         State::declared(name),
///         TransitionType::Change,
///         TransitionResult::Success,
///         "success",
///         Value::Null,
///     ));
/// }
///
/// let snapshot = store.snapshot();
/// assert_eq!(snapshot.len(), 2);
/// assert_eq!(snapshot[0].to_state, State::declared("b"));
/// assert_eq!(snapshot[1].to_state, State::declared("c"));
/// ```
#[derive(Clone, Debug)]
pub struct DebugLogStore {
    records: VecDeque<TransitionRecord>,
    capacity: LogCapacity,
}

impl Default for DebugLogStore {
    fn default() -> Self {
        Self::new(LogCapacity::Unbounded)
    }
}

impl DebugLogStore {
    pub fn new(capacity: LogCapacity) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    /// Append a record, then evict the oldest records until within capacity.
    pub fn append(&mut self, record: TransitionRecord) {
        self.records.push_back(record);
        self.evict();
    }

    /// Copy of every retained record, oldest first.
    pub fn snapshot(&self) -> Vec<TransitionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Change the capacity, evicting from the front if the log no longer fits.
    pub fn set_capacity(&mut self, capacity: LogCapacity) {
        self.capacity = capacity;
        self.evict();
    }

    pub fn capacity(&self) -> LogCapacity {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently appended record still retained.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    fn evict(&mut self) {
        while !self.capacity.admits(self.records.len()) {
            self.records.pop_front();
        }
    }
}
