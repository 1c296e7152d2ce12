//! Layout algorithms
//!
//! Every algorithm implements the two-step [`Layout`] contract: seed
//! positions once, then advance one discrete step per tick and report whether
//! the layout is stable. [`LayoutEngine`] is the closed set of shipped
//! algorithms; adding one means adding a variant here and a match arm in the
//! dispatch below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph_types::Graph;

mod circular;
mod force_directed;

pub use circular::{CircularLayout, MIN_CIRCLE_RADIUS, RADIUS_PER_NODE};
pub use force_directed::{ForceDirectedLayout, MAX_VELOCITY};

/// Layout algorithm names accepted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    #[default]
    ForceDirected,
    SpringEmbedder,
    Circular,
    Hierarchical,
    Random,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 5] = [
        LayoutAlgorithm::ForceDirected,
        LayoutAlgorithm::SpringEmbedder,
        LayoutAlgorithm::Circular,
        LayoutAlgorithm::Hierarchical,
        LayoutAlgorithm::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutAlgorithm::ForceDirected => "force_directed",
            LayoutAlgorithm::SpringEmbedder => "spring_embedder",
            LayoutAlgorithm::Circular => "circular",
            LayoutAlgorithm::Hierarchical => "hierarchical",
            LayoutAlgorithm::Random => "random",
        }
    }

    /// Whether an implementation ships for this name
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            LayoutAlgorithm::ForceDirected | LayoutAlgorithm::Circular
        )
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| GraphError::UnknownAlgorithm(s.to_string()))
    }
}

/// The contract every layout algorithm fulfils
pub trait Layout {
    /// Assign starting coordinates; nodes left unfixed must stay movable
    fn initialize_positions(&mut self, graph: &mut Graph);

    /// Advance one step, returning whether the layout is stable this step
    ///
    /// An `Err` means the step left the graph in a state the next step
    /// cannot recover from (non-finite coordinates). Positions already
    /// written stay in place.
    fn calculate_forces(&mut self, graph: &mut Graph, config: &GraphConfig) -> GraphResult<bool>;
}

/// The shipped layout algorithms
#[derive(Debug, Clone)]
pub enum LayoutEngine {
    ForceDirected(ForceDirectedLayout),
    Circular(CircularLayout),
}

impl LayoutEngine {
    /// Build the engine for an algorithm name
    pub fn for_algorithm(algorithm: LayoutAlgorithm) -> GraphResult<Self> {
        match algorithm {
            LayoutAlgorithm::ForceDirected => Ok(Self::ForceDirected(ForceDirectedLayout)),
            LayoutAlgorithm::Circular => Ok(Self::Circular(CircularLayout)),
            other => Err(GraphError::UnsupportedAlgorithm(other)),
        }
    }

    pub fn algorithm(&self) -> LayoutAlgorithm {
        match self {
            Self::ForceDirected(_) => LayoutAlgorithm::ForceDirected,
            Self::Circular(_) => LayoutAlgorithm::Circular,
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::ForceDirected(ForceDirectedLayout)
    }
}

impl Layout for LayoutEngine {
    fn initialize_positions(&mut self, graph: &mut Graph) {
        match self {
            Self::ForceDirected(layout) => layout.initialize_positions(graph),
            Self::Circular(layout) => layout.initialize_positions(graph),
        }
    }

    fn calculate_forces(&mut self, graph: &mut Graph, config: &GraphConfig) -> GraphResult<bool> {
        match self {
            Self::ForceDirected(layout) => layout.calculate_forces(graph, config),
            Self::Circular(layout) => layout.calculate_forces(graph, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_enumerated_name() {
        for algorithm in LayoutAlgorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<LayoutAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn unknown_name_is_a_named_error() {
        assert!(matches!(
            "spiral".parse::<LayoutAlgorithm>(),
            Err(GraphError::UnknownAlgorithm(name)) if name == "spiral"
        ));
    }

    #[test]
    fn only_force_directed_and_circular_ship() {
        for algorithm in LayoutAlgorithm::ALL {
            match LayoutEngine::for_algorithm(algorithm) {
                Ok(engine) => {
                    assert!(algorithm.is_supported());
                    assert_eq!(engine.algorithm(), algorithm);
                }
                Err(err) => {
                    assert!(!algorithm.is_supported());
                    assert!(matches!(err, GraphError::UnsupportedAlgorithm(a) if a == algorithm));
                }
            }
        }
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&LayoutAlgorithm::SpringEmbedder).unwrap();
        assert_eq!(json, "\"spring_embedder\"");
    }
}
