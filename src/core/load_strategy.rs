//! How eagerly the graph resolves dependencies of a state type.

use serde::{Deserialize, Serialize};

/// Strategy supplied to every lazy-load call on a graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadStrategy {
    /// Load only what was asked for; everything else waits for first use.
    #[default]
    Lazy,

    /// Also resolve the immediate neighbours: a state type's transitions,
    /// or a transition set's target state types.
    Eager,

    /// Resolve everything reachable from the requested type.
    Connected,
}

impl LoadStrategy {
    /// Strategy to apply to whatever this load pulls in.
    ///
    /// `Eager` stops after one hop, `Connected` keeps walking.
    pub(crate) fn for_neighbours(self) -> Option<LoadStrategy> {
        match self {
            Self::Lazy => None,
            Self::Eager => Some(Self::Lazy),
            Self::Connected => Some(Self::Connected),
        }
    }
}
