//! Mermaid state diagram definitions.
//!
//! Rendering is a pure function of the declared states, the adjacency map,
//! the current state and the layout direction. Identical inputs always give
//! byte-identical output.

use crate::core::State;
use crate::graph::AdjacencyMap;
use serde::{Deserialize, Serialize};
use std::fmt;

const HEADER: &str = "stateDiagram-v2";
const HIGHLIGHT_SUFFIX: &str = ":::highlight";
const HIGHLIGHT_CLASS: &str =
    "classDef highlight font-weight:bold,stroke-width:3px,fill:#c6c6f9,stroke:#7d4ce1";

/// Layout direction of the diagram.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum DiagramDirection {
    /// Top to bottom.
    #[default]
    TB,
    /// Left to right.
    LR,
}

impl fmt::Display for DiagramDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramDirection::TB => f.write_str("TB"),
            DiagramDirection::LR => f.write_str("LR"),
        }
    }
}

/// Render a state diagram definition with `current` highlighted.
///
/// `Init`'s edges come first, then each declared state's edges in
/// declaration order. Within a source, destinations keep the order stored in
/// the map. Every edge line whose source is `current` gets the highlight
/// class appended to the source name.
///
/// # Example
///
/// ```rust
/// use fsm_graph::core::State;
/// use fsm_graph::diagram::{render_state_diagram, DiagramDirection};
/// use fsm_graph::transition_map;
///
/// let map = transition_map! {
///     Init => [Idle],
///     Idle => [Terminate],
/// };
/// let diagram = render_state_diagram(
///     &[State::declared("Idle")],
///     &map,
///     &State::declared("Idle"),
///     DiagramDirection::LR,
/// );
///
/// assert_eq!(
///     diagram,
///     "stateDiagram-v2\ndirection LR\n[*] --> Init\nInit --> Idle\n\
///      Idle:::highlight --> Terminate\n\
///      classDef highlight font-weight:bold,stroke-width:3px,fill:#c6c6f9,stroke:#7d4ce1"
/// );
/// ```
pub fn render_state_diagram(
    declared: &[State],
    adjacency: &AdjacencyMap,
    current: &State,
    direction: DiagramDirection,
) -> String {
    let mut lines = vec![
        HEADER.to_string(),
        format!("direction {direction}"),
        format!("[*] --> {}", State::Init),
    ];

    for source in std::iter::once(&State::Init).chain(declared.iter()) {
        let Some(destinations) = adjacency.destinations(source) else {
            continue;
        };
        let suffix = if source == current { HIGHLIGHT_SUFFIX } else { "" };
        for destination in destinations {
            lines.push(format!("{source}{suffix} --> {destination}"));
        }
    }

    lines.push(HIGHLIGHT_CLASS.to_string());
    lines.join("\n")
}
