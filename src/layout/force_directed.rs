//! Force-directed layout
//!
//! Each tick recomputes every unfixed node's velocity from scratch as the sum
//! of three forces, then integrates:
//!
//! - **Repulsion**: inverse-square between every pair of nodes (O(n²))
//! - **Springs**: Hooke's law along each edge around the rest length
//! - **Centering**: a pull toward the origin proportional to distance
//!
//! Velocity is clamped to [`MAX_VELOCITY`] before the position update and
//! damped afterwards. The tick is stable when the average kinetic energy
//! across all nodes drops below the configured threshold.

use std::f32::consts::TAU;

use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph_types::{Graph, GraphNode};

use super::Layout;

/// Speed limit per tick
pub const MAX_VELOCITY: f32 = 10.0;

/// Radius of the circle unfixed nodes are seeded on
const SEED_RADIUS: f32 = 100.0;

/// Iterative physics layout
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceDirectedLayout;

impl Layout for ForceDirectedLayout {
    fn initialize_positions(&mut self, graph: &mut Graph) {
        let total = graph.node_count();
        for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
            if node.fixed {
                continue;
            }
            let angle = TAU * (i as f32) / (total as f32);
            node.x = SEED_RADIUS * angle.cos();
            node.y = SEED_RADIUS * angle.sin();
            node.vx = 0.0;
            node.vy = 0.0;
        }
    }

    fn calculate_forces(&mut self, graph: &mut Graph, config: &GraphConfig) -> GraphResult<bool> {
        for node in graph.nodes_mut().iter_mut().filter(|n| !n.fixed) {
            node.vx = 0.0;
            node.vy = 0.0;
        }

        apply_repulsion(graph.nodes_mut(), config.charge_strength);
        apply_springs(graph, config.force_strength, config.link_distance);
        apply_centering(graph.nodes_mut(), config.center_force);

        let total_energy = integrate(graph.nodes_mut(), config.damping)?;
        let avg_energy = if graph.is_empty() {
            0.0
        } else {
            total_energy / graph.node_count() as f32
        };
        Ok(avg_energy < config.simulation_threshold)
    }
}

/// Push every pair of nodes apart (charge is negative for repulsion)
fn apply_repulsion(nodes: &mut [GraphNode], charge: f32) {
    let n = nodes.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = nodes[i].x - nodes[j].x;
            let dy = nodes[i].y - nodes[j].y;
            let dist_sq = dx * dx + dy * dy;
            // Coincident nodes have no direction to push along
            if dist_sq == 0.0 {
                continue;
            }
            let dist = dist_sq.sqrt();

            // Coulomb's law: F = k / r^2, directed from j to i
            let force = -charge / dist_sq;
            let fx = force * dx / dist;
            let fy = force * dy / dist;

            nodes[i].apply_force(fx, fy);
            nodes[j].apply_force(-fx, -fy);
        }
    }
}

/// Pull (or push) edge endpoints toward the rest length
fn apply_springs(graph: &mut Graph, strength: f32, rest_length: f32) {
    let springs: Vec<(usize, usize, f32)> = graph
        .resolved_edges()
        .map(|(edge, s, t)| (s, t, edge.weight))
        .collect();

    let nodes = graph.nodes_mut();
    for (s, t, weight) in springs {
        let dx = nodes[t].x - nodes[s].x;
        let dy = nodes[t].y - nodes[s].y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist == 0.0 {
            continue;
        }

        // Hooke's law: F = k * (x - x0), scaled by edge weight
        let force = strength * (dist - rest_length) * weight;
        let fx = dx / dist * force;
        let fy = dy / dist * force;

        nodes[s].apply_force(fx, fy);
        nodes[t].apply_force(-fx, -fy);
    }
}

fn apply_centering(nodes: &mut [GraphNode], strength: f32) {
    for node in nodes {
        node.apply_force(-node.x * strength, -node.y * strength);
    }
}

/// Clamp, move and damp unfixed nodes; returns their total kinetic energy
fn integrate(nodes: &mut [GraphNode], damping: f32) -> GraphResult<f32> {
    let mut total_energy = 0.0;
    for node in nodes.iter_mut().filter(|n| !n.fixed) {
        let speed = node.speed();
        if speed > MAX_VELOCITY {
            node.vx = node.vx / speed * MAX_VELOCITY;
            node.vy = node.vy / speed * MAX_VELOCITY;
        }

        node.x += node.vx;
        node.y += node.vy;
        node.vx *= damping;
        node.vy *= damping;

        if !(node.x.is_finite() && node.y.is_finite()) {
            return Err(GraphError::NonFiniteState {
                node: node.id.clone(),
            });
        }
        total_energy += node.kinetic_energy();
    }
    Ok(total_energy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::graph_types::{EdgeSpec, NodeSpec};

    fn graph(ids: &[&str], edges: Vec<EdgeSpec>) -> Graph {
        Graph::from_specs(
            ids.iter().map(|id| NodeSpec::new(*id)).collect(),
            edges,
            (20.0, 50.0),
        )
    }

    fn place(graph: &mut Graph, positions: &[(f32, f32)]) {
        for (node, &(x, y)) in graph.nodes_mut().iter_mut().zip(positions) {
            node.set_position(Point::new(x, y));
        }
    }

    fn distance(graph: &Graph) -> f32 {
        graph.nodes()[0].distance_to(&graph.nodes()[1])
    }

    fn repulsion_only() -> GraphConfig {
        GraphConfig {
            charge_strength: -300.0,
            center_force: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn initialize_places_unfixed_nodes_on_seed_circle() {
        let mut g = graph(&["a", "b", "c", "d"], vec![]);
        g.nodes_mut()[2].fixed = true;
        g.nodes_mut()[2].set_position(Point::new(7.0, 7.0));

        ForceDirectedLayout.initialize_positions(&mut g);

        let a = g.nodes()[0].position();
        assert!((a.x - 100.0).abs() < 1e-4 && a.y.abs() < 1e-4);
        let b = g.nodes()[1].position();
        assert!(b.x.abs() < 1e-4 && (b.y - 100.0).abs() < 1e-4);
        // Fixed node is untouched
        assert_eq!(g.nodes()[2].position(), Point::new(7.0, 7.0));
        assert!(!g.nodes()[0].fixed);
    }

    #[test]
    fn first_tick_pushes_pair_apart() {
        let mut g = graph(&["a", "b"], vec![]);
        place(&mut g, &[(-5.0, 0.0), (5.0, 0.0)]);

        ForceDirectedLayout
            .calculate_forces(&mut g, &repulsion_only())
            .unwrap();

        let (a, b) = (&g.nodes()[0], &g.nodes()[1]);
        assert!(a.speed() > 0.0 && b.speed() > 0.0);
        assert!(a.vx < 0.0, "a should move away from b");
        assert!(b.vx > 0.0, "b should move away from a");
        assert!(distance(&g) > 10.0);
    }

    #[test]
    fn repulsion_grows_distance_until_stable() {
        let config = repulsion_only();
        let mut g = graph(&["a", "b"], vec![]);
        place(&mut g, &[(-5.0, 0.0), (5.0, 0.0)]);

        let mut layout = ForceDirectedLayout;
        let mut last = distance(&g);
        let mut stable = false;
        for _ in 0..1000 {
            stable = layout.calculate_forces(&mut g, &config).unwrap();
            let d = distance(&g);
            assert!(d > last, "distance must strictly increase");
            last = d;
            if stable {
                break;
            }
        }
        assert!(stable, "damping should bring the pair to rest");
    }

    #[test]
    fn spring_at_rest_length_is_already_stable() {
        let config = GraphConfig {
            charge_strength: 0.0,
            center_force: 0.0,
            force_strength: 30.0,
            link_distance: 100.0,
            ..Default::default()
        };
        let mut g = graph(&["a", "b"], vec![EdgeSpec::new("a", "b").with_weight(1.0)]);
        place(&mut g, &[(0.0, 0.0), (100.0, 0.0)]);

        let stable = ForceDirectedLayout.calculate_forces(&mut g, &config).unwrap();

        assert!(stable);
        assert!(g.nodes()[0].speed() < 1e-3);
        assert!((distance(&g) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn stretched_spring_pulls_endpoints_together() {
        let config = GraphConfig {
            charge_strength: 0.0,
            center_force: 0.0,
            force_strength: 0.01,
            ..Default::default()
        };
        let mut g = graph(&["a", "b"], vec![EdgeSpec::new("a", "b")]);
        place(&mut g, &[(0.0, 0.0), (300.0, 0.0)]);

        ForceDirectedLayout.calculate_forces(&mut g, &config).unwrap();

        assert!(g.nodes()[0].x > 0.0);
        assert!(g.nodes()[1].x < 300.0);
    }

    #[test]
    fn velocity_is_clamped() {
        let config = GraphConfig {
            damping: 1.0,
            ..Default::default()
        };
        let mut g = graph(&["a"], vec![]);
        place(&mut g, &[(10_000.0, 0.0)]);

        ForceDirectedLayout.calculate_forces(&mut g, &config).unwrap();

        assert!((g.nodes()[0].speed() - MAX_VELOCITY).abs() < 1e-3);
        assert!((g.nodes()[0].x - (10_000.0 - MAX_VELOCITY)).abs() < 1e-2);
    }

    #[test]
    fn fixed_nodes_do_not_move() {
        let mut g = graph(&["a", "b"], vec![EdgeSpec::new("a", "b")]);
        place(&mut g, &[(0.0, 0.0), (40.0, 0.0)]);
        g.nodes_mut()[0].fixed = true;

        ForceDirectedLayout
            .calculate_forces(&mut g, &GraphConfig::default())
            .unwrap();

        assert_eq!(g.nodes()[0].position(), Point::new(0.0, 0.0));
        assert_ne!(g.nodes()[1].position(), Point::new(40.0, 0.0));
    }

    #[test]
    fn edges_to_missing_nodes_are_ignored() {
        let config = GraphConfig {
            charge_strength: 0.0,
            center_force: 0.0,
            ..Default::default()
        };
        let mut g = graph(&["a"], vec![EdgeSpec::new("a", "ghost")]);
        place(&mut g, &[(3.0, 4.0)]);

        let stable = ForceDirectedLayout.calculate_forces(&mut g, &config).unwrap();

        assert!(stable);
        assert_eq!(g.nodes()[0].position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn non_finite_position_fails_the_tick() {
        let mut g = graph(&["a", "b"], vec![]);
        place(&mut g, &[(f32::NAN, 0.0), (5.0, 0.0)]);

        let result = ForceDirectedLayout.calculate_forces(&mut g, &GraphConfig::default());

        assert!(matches!(result, Err(GraphError::NonFiniteState { .. })));
    }

    #[test]
    fn stable_layout_stays_put_under_repeated_ticks() {
        let config = GraphConfig::default();
        let mut g = graph(
            &["a", "b", "c"],
            vec![EdgeSpec::new("a", "b"), EdgeSpec::new("a", "c")],
        );
        let mut layout = ForceDirectedLayout;
        layout.initialize_positions(&mut g);

        let mut stable_in_a_row = 0;
        for _ in 0..5_000 {
            if layout.calculate_forces(&mut g, &config).unwrap() {
                stable_in_a_row += 1;
                if stable_in_a_row == 2 {
                    break;
                }
            } else {
                stable_in_a_row = 0;
            }
        }
        assert_eq!(stable_in_a_row, 2, "layout should settle");

        // A stable result caps the damped kinetic energy, which caps how far
        // any node moved in that call
        let n = g.node_count() as f32;
        let max_step = (2.0 * config.simulation_threshold * n).sqrt() / config.damping;
        for _ in 0..100 {
            let before: Vec<Point> = g.nodes().iter().map(|node| node.position()).collect();
            assert!(layout.calculate_forces(&mut g, &config).unwrap());
            for (node, prev) in g.nodes().iter().zip(&before) {
                let moved = node.position().distance_to(*prev);
                assert!(moved <= max_step, "{} moved {moved}", node.id);
            }
        }
    }

    #[test]
    fn empty_graph_is_stable() {
        let mut g = graph(&[], vec![]);
        assert!(
            ForceDirectedLayout
                .calculate_forces(&mut g, &GraphConfig::default())
                .unwrap()
        );
    }
}
