//! Observer channels used to publish machine state to a host.

mod broadcast;

pub use broadcast::{Broadcast, SubscriptionHandle};
