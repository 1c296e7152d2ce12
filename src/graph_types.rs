//! Graph data types: input records supplied by the host and the working
//! node/edge set the simulation mutates.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::geometry::{Point, Rect};

/// Base visual size of a node with weight 1.0
pub const BASE_NODE_SIZE: f32 = 30.0;

/// Visual size added per unit of weight above 1.0
pub const SIZE_PER_WEIGHT: f32 = 10.0;

/// Free-form metadata carried alongside nodes and edges
pub type Metadata = BTreeMap<String, Value>;

/// Story entity category, used to pick a node color
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCategory {
    #[serde(alias = "character")]
    Character,
    #[serde(alias = "location")]
    Location,
    #[serde(alias = "object")]
    Object,
    #[serde(alias = "lore")]
    Lore,
    #[serde(alias = "subplot")]
    Subplot,
    /// Anything else, including categories this engine does not know
    #[default]
    #[serde(other)]
    Other,
}

/// A node as supplied by the host in `set_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique key within one graph
    pub id: String,

    /// Display label; the id is shown when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, alias = "type")]
    pub category: NodeCategory,

    #[serde(default = "default_weight")]
    pub weight: f32,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            category: NodeCategory::Other,
            weight: 1.0,
            metadata: Metadata::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_category(mut self, category: NodeCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// An edge as supplied by the host in `set_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default = "default_weight")]
    pub weight: f32,

    /// Relationship type tag (e.g. "ally", "located_in")
    #[serde(default = "default_edge_kind", rename = "type")]
    pub kind: String,

    /// Undirected edges are drawn without an arrowhead
    #[serde(default)]
    pub bidirectional: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl EdgeSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
            weight: 1.0,
            kind: default_edge_kind(),
            bidirectional: false,
            metadata: Metadata::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }
}

fn default_weight() -> f32 {
    1.0
}

fn default_edge_kind() -> String {
    "default".to_string()
}

/// Complete graph document, as read from JSON by the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

/// A node in the working graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub category: NodeCategory,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Visual diameter
    pub size: f32,
    /// Excluded from force integration
    pub fixed: bool,
    pub selected: bool,
    pub highlighted: bool,
    pub weight: f32,
    pub metadata: Metadata,
}

impl GraphNode {
    /// Build a working node from its spec; `size_range` bounds the visual size
    pub fn from_spec(spec: NodeSpec, size_range: (f32, f32)) -> Self {
        let size = node_size_for_weight(spec.weight, size_range);
        Self {
            label: spec.label.unwrap_or_else(|| spec.id.clone()),
            id: spec.id,
            category: spec.category,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            size,
            fixed: false,
            selected: false,
            highlighted: false,
            weight: spec.weight,
            metadata: spec.metadata,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    pub fn distance_to(&self, other: &GraphNode) -> f32 {
        self.position().distance_to(other.position())
    }

    /// Add a force to the velocity; fixed nodes ignore it
    pub fn apply_force(&mut self, fx: f32, fy: f32) {
        if !self.fixed {
            self.vx += fx;
            self.vy += fy;
        }
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * (self.vx * self.vx + self.vy * self.vy)
    }

    /// Bounding box of the node's circle
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position(), self.size, self.size)
    }

    /// Whether `p` falls within the node's circle
    pub fn hit(&self, p: Point) -> bool {
        self.position().distance_to(p) <= self.size / 2.0
    }
}

/// Visual diameter derived from a node's weight, clamped to `(min, max)`
pub fn node_size_for_weight(weight: f32, (min, max): (f32, f32)) -> f32 {
    (BASE_NODE_SIZE + (weight - 1.0) * SIZE_PER_WEIGHT).clamp(min, max)
}

/// An edge in the working graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
    pub weight: f32,
    pub kind: String,
    pub bidirectional: bool,
    pub metadata: Metadata,
}

impl From<EdgeSpec> for GraphEdge {
    fn from(spec: EdgeSpec) -> Self {
        Self {
            source: spec.source,
            target: spec.target,
            label: spec.label.unwrap_or_default(),
            weight: spec.weight,
            kind: spec.kind,
            bidirectional: spec.bidirectional,
            metadata: spec.metadata,
        }
    }
}

/// The working node/edge set for one `set_data` generation
///
/// Nodes keep their insertion order (layouts that place nodes by index rely
/// on it) and are looked up by id through an index map.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
}

impl Graph {
    /// Build a graph from host records
    ///
    /// A node whose id repeats an earlier one replaces it in place. Edges are
    /// kept as given; those pointing at unknown ids are skipped wherever the
    /// graph is traversed.
    pub fn from_specs(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>, size_range: (f32, f32)) -> Self {
        let mut graph = Graph::default();
        for spec in nodes {
            let node = GraphNode::from_spec(spec, size_range);
            match graph.index.get(&node.id) {
                Some(&i) => {
                    warn!(id = %node.id, "duplicate node id, keeping the last definition");
                    graph.nodes[i] = node;
                }
                None => {
                    graph.index.insert(node.id.clone(), graph.nodes.len());
                    graph.nodes.push(node);
                }
            }
        }
        graph.edges = edges.into_iter().map(GraphEdge::from).collect();
        for edge in &graph.edges {
            if graph.edge_endpoints(edge).is_none() {
                debug!(source = %edge.source, target = %edge.target, "skipping edge with unknown endpoint");
            }
        }
        graph
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.index_of(id).map(move |i| &mut self.nodes[i])
    }

    /// Node indices of an edge's endpoints, or `None` if either is missing
    pub fn edge_endpoints(&self, edge: &GraphEdge) -> Option<(usize, usize)> {
        Some((self.index_of(&edge.source)?, self.index_of(&edge.target)?))
    }

    /// Edges whose endpoints both exist, with their node indices
    pub fn resolved_edges(&self) -> impl Iterator<Item = (&GraphEdge, usize, usize)> + '_ {
        self.edges
            .iter()
            .filter_map(|e| self.edge_endpoints(e).map(|(s, t)| (e, s, t)))
    }

    /// The node nearest to `p` whose circle contains it
    pub fn node_at(&self, p: Point) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.hit(p))
            .min_by(|(_, a), (_, b)| {
                let da = a.position().distance_to(p);
                let db = b.position().distance_to(p);
                da.total_cmp(&db)
            })
            .map(|(i, _)| i)
    }

    /// Bounding box of every node's circle
    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(self.nodes.iter().flat_map(|n| {
            let b = n.bounds();
            [
                Point::new(b.left(), b.top()),
                Point::new(b.right(), b.bottom()),
            ]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: (f32, f32) = (20.0, 50.0);

    #[test]
    fn node_size_grows_with_weight_and_clamps() {
        assert_eq!(node_size_for_weight(1.0, RANGE), 30.0);
        assert_eq!(node_size_for_weight(2.5, RANGE), 45.0);
        assert_eq!(node_size_for_weight(10.0, RANGE), 50.0);
        assert_eq!(node_size_for_weight(0.0, RANGE), 20.0);
    }

    #[test]
    fn label_defaults_to_id() {
        let node = GraphNode::from_spec(NodeSpec::new("aria"), RANGE);
        assert_eq!(node.label, "aria");
        let node = GraphNode::from_spec(NodeSpec::new("aria").with_label("Aria Vance"), RANGE);
        assert_eq!(node.label, "Aria Vance");
    }

    #[test]
    fn fixed_node_ignores_force() {
        let mut node = GraphNode::from_spec(NodeSpec::new("a"), RANGE);
        node.fixed = true;
        node.apply_force(5.0, 5.0);
        assert_eq!((node.vx, node.vy), (0.0, 0.0));
        node.fixed = false;
        node.apply_force(3.0, 4.0);
        assert_eq!(node.speed(), 5.0);
        assert_eq!(node.kinetic_energy(), 12.5);
    }

    #[test]
    fn duplicate_ids_last_write_wins() {
        let graph = Graph::from_specs(
            vec![
                NodeSpec::new("a").with_label("First"),
                NodeSpec::new("b"),
                NodeSpec::new("a").with_label("Second"),
            ],
            vec![],
            RANGE,
        );
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node("a").unwrap().label, "Second");
        assert_eq!(graph.index_of("a"), Some(0));
    }

    #[test]
    fn unresolved_edges_are_skipped() {
        let graph = Graph::from_specs(
            vec![NodeSpec::new("a"), NodeSpec::new("b")],
            vec![EdgeSpec::new("a", "b"), EdgeSpec::new("a", "ghost")],
            RANGE,
        );
        assert_eq!(graph.edge_count(), 2);
        let resolved: Vec<_> = graph.resolved_edges().map(|(_, s, t)| (s, t)).collect();
        assert_eq!(resolved, vec![(0, 1)]);
    }

    #[test]
    fn node_at_picks_nearest_hit() {
        let mut graph = Graph::from_specs(
            vec![NodeSpec::new("a"), NodeSpec::new("b")],
            vec![],
            RANGE,
        );
        graph.nodes_mut()[0].set_position(Point::new(0.0, 0.0));
        graph.nodes_mut()[1].set_position(Point::new(10.0, 0.0));

        assert_eq!(graph.node_at(Point::new(8.0, 0.0)), Some(1));
        assert_eq!(graph.node_at(Point::new(-14.0, 0.0)), Some(0));
        assert_eq!(graph.node_at(Point::new(0.0, 40.0)), None);
    }

    #[test]
    fn deserializes_host_records() {
        let data: GraphData = serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "aria", "label": "Aria", "category": "CHARACTER", "weight": 2.0},
                    {"id": "keep", "type": "location"},
                    {"id": "x", "category": "FACTION"}
                ],
                "edges": [
                    {"source": "aria", "target": "keep", "type": "lives_in", "bidirectional": true}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(data.nodes[0].category, NodeCategory::Character);
        assert_eq!(data.nodes[1].category, NodeCategory::Location);
        assert_eq!(data.nodes[2].category, NodeCategory::Other);
        assert_eq!(data.nodes[1].weight, 1.0);
        assert_eq!(data.edges[0].kind, "lives_in");
        assert!(data.edges[0].bidirectional);
        assert_eq!(data.edges[0].weight, 1.0);
    }
}
