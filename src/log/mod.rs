//! Debug log storage and presentation.
//!
//! The store is a bounded FIFO of [`TransitionRecord`](crate::core::TransitionRecord)s.
//! Filtering of repeated updates happens at the producer, never here.

mod presentation;
mod store;

pub use presentation::{present_debug_log, DebugLogRow, EntryCategory};
pub use store::{DebugLogStore, LogCapacity};
