//! Rendering pass
//!
//! Turns the working graph into draw calls on a [`Surface`]. Drawing happens
//! in world coordinates; the host applies its zoom/pan transform to the
//! surface and passes the matching visible region so off-screen entities
//! are culled.
//!
//! Z-order is fixed: edges, then nodes, then node labels, then edge labels.

use std::f32::consts::FRAC_PI_6;

use serde::Serialize;

use crate::color::Color;
use crate::config::GraphConfig;
use crate::geometry::{Point, Rect};
use crate::graph_types::{Graph, GraphEdge, GraphNode};

/// Edge stroke width
pub const EDGE_WIDTH: f32 = 2.0;

/// Node outline width
pub const NODE_OUTLINE_WIDTH: f32 = 2.0;

/// Length of each arrowhead stroke
pub const ARROW_SIZE: f32 = 8.0;

/// Angle between an arrowhead stroke and the edge (30 degrees)
pub const ARROW_ANGLE: f32 = FRAC_PI_6;

/// Label box dimensions and gap below the node
const LABEL_WIDTH: f32 = 100.0;
const LABEL_HEIGHT: f32 = 20.0;
const LABEL_GAP: f32 = 5.0;

/// Percentages for selection/highlight shading and outlines
const SELECTED_LIGHTER: u32 = 120;
const HIGHLIGHTED_DARKER: u32 = 120;
const OUTLINE_DARKER: u32 = 130;

/// Line style
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// A drawing target in world coordinates
pub trait Surface {
    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke);

    fn draw_circle(&mut self, center: Point, radius: f32, fill: Color, outline: Stroke);

    /// Draw text centered in `bounds`
    fn draw_text(&mut self, bounds: Rect, text: &str, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Color,
        outline: Stroke,
    },
    Text {
        bounds: Rect,
        text: String,
        color: Color,
    },
}

/// Surface that records draw calls instead of rasterizing them
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = (&Point, &Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, fill, .. } => Some((center, fill)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn draw_circle(&mut self, center: Point, radius: f32, fill: Color, outline: Stroke) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
            outline,
        });
    }

    fn draw_text(&mut self, bounds: Rect, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            bounds,
            text: text.to_string(),
            color,
        });
    }
}

/// Counts of entities that survived culling in one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub edges: usize,
    pub nodes: usize,
    pub labels: usize,
}

/// Draws a graph with styles resolved from configuration
pub struct Renderer<'a> {
    config: &'a GraphConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a GraphConfig) -> Self {
        Self { config }
    }

    /// Draw every visible edge, node and label
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        visible: Rect,
        graph: &Graph,
    ) -> RenderStats {
        let mut stats = RenderStats {
            edges: self.render_edges(surface, visible, graph),
            nodes: self.render_nodes(surface, visible, graph.nodes()),
            labels: 0,
        };

        let labels = self.config.labels;
        if labels.show_node_labels() {
            stats.labels += self.render_node_labels(surface, visible, graph.nodes());
        }
        if labels.show_edge_labels() {
            stats.labels += self.render_edge_labels(surface, visible, graph);
        }
        stats
    }

    fn render_edges<S: Surface + ?Sized>(&self, surface: &mut S, visible: Rect, graph: &Graph) -> usize {
        let stroke = Stroke {
            color: self.config.edge_color,
            width: EDGE_WIDTH,
        };

        let mut drawn = 0;
        for (edge, s, t) in graph.resolved_edges() {
            let (source, target) = (&graph.nodes()[s], &graph.nodes()[t]);
            if !is_edge_visible(visible, source, target) {
                continue;
            }

            surface.draw_line(source.position(), target.position(), stroke);
            if !edge.bidirectional {
                if let Some([tip1, tip2]) = arrowhead(source, target) {
                    let start = arrow_base(source, target);
                    surface.draw_line(start, tip1, stroke);
                    surface.draw_line(start, tip2, stroke);
                }
            }
            drawn += 1;
        }
        drawn
    }

    fn render_nodes<S: Surface + ?Sized>(&self, surface: &mut S, visible: Rect, nodes: &[GraphNode]) -> usize {
        let mut drawn = 0;
        for node in nodes.iter().filter(|n| is_node_visible(visible, n)) {
            let fill = self.node_fill(node);
            let outline = Stroke {
                color: fill.darker(OUTLINE_DARKER),
                width: NODE_OUTLINE_WIDTH,
            };
            surface.draw_circle(node.position(), node.size / 2.0, fill, outline);
            drawn += 1;
        }
        drawn
    }

    /// Labels sit in a box just below each node
    fn render_node_labels<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        visible: Rect,
        nodes: &[GraphNode],
    ) -> usize {
        let mut drawn = 0;
        for node in nodes.iter().filter(|n| is_node_visible(visible, n)) {
            let bounds = Rect::new(
                node.x - LABEL_WIDTH / 2.0,
                node.y + node.size / 2.0 + LABEL_GAP,
                LABEL_WIDTH,
                LABEL_HEIGHT,
            );
            surface.draw_text(bounds, &node.label, self.config.text_color);
            drawn += 1;
        }
        drawn
    }

    fn render_edge_labels<S: Surface + ?Sized>(&self, surface: &mut S, visible: Rect, graph: &Graph) -> usize {
        let mut drawn = 0;
        for (edge, s, t) in graph.resolved_edges() {
            let (source, target) = (&graph.nodes()[s], &graph.nodes()[t]);
            if edge_label(edge).is_none() || !is_edge_visible(visible, source, target) {
                continue;
            }
            let mid = Point::new((source.x + target.x) / 2.0, (source.y + target.y) / 2.0);
            let bounds = Rect::centered(mid, LABEL_WIDTH, LABEL_HEIGHT);
            surface.draw_text(bounds, &edge.label, self.config.text_color);
            drawn += 1;
        }
        drawn
    }

    /// Category color, lightened when selected or else darkened when highlighted
    pub fn node_fill(&self, node: &GraphNode) -> Color {
        let base = self.config.node_color(node.category);
        if node.selected {
            base.lighter(SELECTED_LIGHTER)
        } else if node.highlighted {
            base.darker(HIGHLIGHTED_DARKER)
        } else {
            base
        }
    }
}

fn edge_label(edge: &GraphEdge) -> Option<&str> {
    (!edge.label.is_empty()).then_some(edge.label.as_str())
}

/// A node is visible when its center lies within the region grown by its size
pub fn is_node_visible(visible: Rect, node: &GraphNode) -> bool {
    visible.expanded(node.size).contains(node.position())
}

/// An edge is visible when the box spanning its endpoints meets the region
pub fn is_edge_visible(visible: Rect, source: &GraphNode, target: &GraphNode) -> bool {
    visible.intersects(&Rect::from_corners(source.position(), target.position()))
}

/// Where the arrowhead meets the target node's rim
fn arrow_base(source: &GraphNode, target: &GraphNode) -> Point {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return target.position();
    }
    let (ux, uy) = (dx / length, dy / length);
    Point::new(target.x - ux * target.size / 2.0, target.y - uy * target.size / 2.0)
}

/// The two arrowhead stroke endpoints, or `None` for coincident endpoints
pub fn arrowhead(source: &GraphNode, target: &GraphNode) -> Option<[Point; 2]> {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return None;
    }

    let (ux, uy) = (dx / length, dy / length);
    let base = arrow_base(source, target);
    let (cos, sin) = (ARROW_ANGLE.cos(), ARROW_ANGLE.sin());

    // Unit vector rotated by +/-30 degrees, pointing back along the edge
    let tip1 = Point::new(
        base.x - ARROW_SIZE * (ux * cos - uy * sin),
        base.y - ARROW_SIZE * (uy * cos + ux * sin),
    );
    let tip2 = Point::new(
        base.x - ARROW_SIZE * (ux * cos + uy * sin),
        base.y - ARROW_SIZE * (uy * cos - ux * sin),
    );
    Some([tip1, tip2])
}
