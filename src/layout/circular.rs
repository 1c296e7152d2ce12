//! Circular layout
//!
//! Closed form: nodes are spaced evenly on a circle and pinned there. The
//! layout is stable from its first step.

use std::f32::consts::TAU;

use crate::config::GraphConfig;
use crate::error::GraphResult;
use crate::graph_types::Graph;

use super::Layout;

/// Smallest circle radius
pub const MIN_CIRCLE_RADIUS: f32 = 100.0;

/// Radius added per node so larger graphs do not overlap
pub const RADIUS_PER_NODE: f32 = 15.0;

/// Even spacing on a circle, all nodes pinned
///
/// Nodes stay fixed after switching to another algorithm; a force-directed
/// run afterwards leaves them where they are until something unpins them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularLayout;

impl CircularLayout {
    pub fn radius_for(node_count: usize) -> f32 {
        MIN_CIRCLE_RADIUS.max(node_count as f32 * RADIUS_PER_NODE)
    }
}

impl Layout for CircularLayout {
    fn initialize_positions(&mut self, graph: &mut Graph) {
        if graph.is_empty() {
            return;
        }

        let total = graph.node_count();
        let radius = Self::radius_for(total);
        let step = TAU / total as f32;

        for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
            let angle = i as f32 * step;
            node.x = radius * angle.cos();
            node.y = radius * angle.sin();
            node.vx = 0.0;
            node.vy = 0.0;
            node.fixed = true;
        }
    }

    fn calculate_forces(&mut self, _graph: &mut Graph, _config: &GraphConfig) -> GraphResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_types::NodeSpec;

    fn graph(n: usize) -> Graph {
        Graph::from_specs(
            (0..n).map(|i| NodeSpec::new(format!("n{i}"))).collect(),
            vec![],
            (20.0, 50.0),
        )
    }

    #[test]
    fn four_nodes_land_on_right_angles() {
        let mut g = graph(4);
        CircularLayout.initialize_positions(&mut g);

        let expected = [(100.0, 0.0), (0.0, 100.0), (-100.0, 0.0), (0.0, -100.0)];
        for (node, (ex, ey)) in g.nodes().iter().zip(expected) {
            assert!((node.x - ex).abs() < 1e-3, "{} x={}", node.id, node.x);
            assert!((node.y - ey).abs() < 1e-3, "{} y={}", node.id, node.y);
            assert!(node.fixed);
        }
    }

    #[test]
    fn stable_on_first_call() {
        let mut g = graph(4);
        let mut layout = CircularLayout;
        layout.initialize_positions(&mut g);
        assert!(layout.calculate_forces(&mut g, &GraphConfig::default()).unwrap());
    }

    #[test]
    fn radius_grows_with_node_count() {
        assert_eq!(CircularLayout::radius_for(3), 100.0);
        assert_eq!(CircularLayout::radius_for(20), 300.0);

        let mut g = graph(20);
        CircularLayout.initialize_positions(&mut g);
        for node in g.nodes() {
            let r = (node.x * node.x + node.y * node.y).sqrt();
            assert!((r - 300.0).abs() < 1e-2);
        }
    }

    #[test]
    fn empty_graph_is_a_no_op() {
        let mut g = graph(0);
        CircularLayout.initialize_positions(&mut g);
        assert!(g.is_empty());
    }
}
