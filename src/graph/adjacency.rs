//! Ordered adjacency map of permitted transitions.

use crate::core::State;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Mapping from a source state to the ordered, deduplicated list of states it
/// may leave to.
///
/// Source order is insertion order and is preserved through serialization,
/// which matters for deterministic diagram output.
///
/// # Example
///
/// ```rust
/// use fsm_graph::core::State;
/// use fsm_graph::graph::AdjacencyMap;
///
/// let map = AdjacencyMap::new()
///     .with_edges(State::Init, ["Idle"])
///     .with_edges("Idle", ["Busy", "Busy", "Terminate"]);
///
/// assert_eq!(
///     map.destinations(&State::declared("Idle")),
///     Some(&[State::declared("Busy"), State::Terminate][..])
/// );
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AdjacencyMap {
    entries: Vec<(State, Vec<State>)>,
}

impl AdjacencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent form of [`set_destinations`](Self::set_destinations).
    pub fn with_edges<S, D, I>(mut self, source: S, destinations: I) -> Self
    where
        S: Into<State>,
        D: Into<State>,
        I: IntoIterator<Item = D>,
    {
        self.set_destinations(source.into(), destinations.into_iter().map(Into::into));
        self
    }

    /// Replace the destinations of `source`, dropping duplicates.
    ///
    /// A new source is appended after the existing ones; an existing source
    /// keeps its position.
    pub fn set_destinations<I>(&mut self, source: State, destinations: I)
    where
        I: IntoIterator<Item = State>,
    {
        let mut deduped: Vec<State> = Vec::new();
        for destination in destinations {
            if !deduped.contains(&destination) {
                deduped.push(destination);
            }
        }

        match self.entries.iter_mut().find(|(s, _)| *s == source) {
            Some((_, existing)) => *existing = deduped,
            None => self.entries.push((source, deduped)),
        }
    }

    /// Append one destination to `source`, creating the entry if needed.
    /// Returns `false` if the edge already existed.
    pub fn add_destination(&mut self, source: &State, destination: State) -> bool {
        match self.entries.iter_mut().find(|(s, _)| s == source) {
            Some((_, existing)) if existing.contains(&destination) => false,
            Some((_, existing)) => {
                existing.push(destination);
                true
            }
            None => {
                self.entries.push((source.clone(), vec![destination]));
                true
            }
        }
    }

    pub fn destinations(&self, source: &State) -> Option<&[State]> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, destinations)| destinations.as_slice())
    }

    pub fn contains_source(&self, source: &State) -> bool {
        self.entries.iter().any(|(s, _)| s == source)
    }

    /// True if any entry leaves to `state`.
    pub fn is_destination(&self, state: &State) -> bool {
        self.entries
            .iter()
            .any(|(_, destinations)| destinations.contains(state))
    }

    /// States from `declared` that no entry leaves to, in declared order.
    pub fn orphans<'a>(&self, declared: &'a [State]) -> Vec<&'a State> {
        declared
            .iter()
            .filter(|state| !self.is_destination(state))
            .collect()
    }

    pub fn sources(&self) -> impl Iterator<Item = &State> {
        self.entries.iter().map(|(source, _)| source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, &[State])> {
        self.entries
            .iter()
            .map(|(source, destinations)| (source, destinations.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AdjacencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (source, destinations) in &self.entries {
            map.serialize_entry(source, destinations)?;
        }
        map.end()
    }
}

struct AdjacencyVisitor;

impl<'de> Visitor<'de> for AdjacencyVisitor {
    type Value = AdjacencyMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from state names to lists of state names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = AdjacencyMap::new();
        while let Some((source, destinations)) = access.next_entry::<State, Vec<State>>()? {
            map.set_destinations(source, destinations);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for AdjacencyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AdjacencyVisitor)
    }
}

/// Declare an [`AdjacencyMap`] inline.
///
/// `Init` and `Terminate` map to the synthetic states; any other identifier
/// becomes a declared state of the same name.
///
/// # Example
///
/// ```
/// use fsm_graph::core::State;
/// use fsm_graph::transition_map;
///
/// let map = transition_map! {
///     Init => [Idle],
///     Idle => [Busy, Terminate],
///     Busy => [Idle],
/// };
///
/// assert_eq!(map.len(), 3);
/// assert!(map.is_destination(&State::Terminate));
/// ```
#[macro_export]
macro_rules! transition_map {
    (
        $(
            $source:ident => [ $( $destination:ident ),* $(,)? ]
        ),* $(,)?
    ) => {{
        let mut map = $crate::graph::AdjacencyMap::new();
        $(
            map.set_destinations(
                $crate::core::State::from(stringify!($source)),
                vec![$($crate::core::State::from(stringify!($destination))),*],
            );
        )*
        map
    }};
}
