//! Multicast notification channel with optional replay of the last value.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one subscription so it can be cancelled later.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SubscriptionHandle(Uuid);

impl SubscriptionHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Observer<T> = Box<dyn FnMut(&T) + Send>;

/// A list of observers plus, when replay is on, the last published value.
///
/// With replay, a new subscriber is immediately called with the most recent
/// value. Without it, subscribers only see values published after they
/// subscribed. A closed channel ignores publishes and never stores new
/// observers; closing twice is harmless.
///
/// # Example
///
/// ```rust
/// use fsm_graph::observe::Broadcast;
/// use std::sync::{Arc, Mutex};
///
/// let mut channel = Broadcast::with_replay();
/// channel.publish(1);
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// channel.subscribe(move |v: &i32| sink.lock().unwrap().push(*v));
/// channel.publish(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// ```
pub struct Broadcast<T> {
    observers: Vec<(SubscriptionHandle, Observer<T>)>,
    last: Option<T>,
    replay: bool,
    closed: bool,
}

impl<T: Clone> Broadcast<T> {
    /// A channel that does not replay to late subscribers.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            last: None,
            replay: false,
            closed: false,
        }
    }

    /// A channel that replays its last value to each new subscriber.
    pub fn with_replay() -> Self {
        Self {
            replay: true,
            ..Self::new()
        }
    }

    pub fn subscribe<F>(&mut self, mut observer: F) -> SubscriptionHandle
    where
        F: FnMut(&T) + Send + 'static,
    {
        let handle = SubscriptionHandle::new();
        if self.closed {
            return handle;
        }
        if let Some(last) = &self.last {
            observer(last);
        }
        self.observers.push((handle, Box::new(observer)));
        handle
    }

    /// Remove a subscription. Returns `false` if it was not registered here.
    pub fn unsubscribe(&mut self, handle: &SubscriptionHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(h, _)| h != handle);
        self.observers.len() != before
    }

    pub fn publish(&mut self, value: T) {
        if self.closed {
            return;
        }
        for (_, observer) in self.observers.iter_mut() {
            observer(&value);
        }
        if self.replay {
            self.last = Some(value);
        }
    }

    /// Drop the cached value so later subscribers receive nothing on
    /// subscription.
    pub fn forget_last(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Drop every observer and make the channel inert.
    pub fn close(&mut self) {
        self.observers.clear();
        self.last = None;
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T: Clone> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcast")
            .field("observers", &self.observers.len())
            .field("has_last", &self.last.is_some())
            .field("replay", &self.replay)
            .field("closed", &self.closed)
            .finish()
    }
}
