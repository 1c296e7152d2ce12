//! Pointer interaction
//!
//! A three-state machine over pointer events: idle, dragging a node, or
//! panning the view. All coordinates are world coordinates; the host maps
//! screen positions through its camera before calling in.

use std::collections::BTreeSet;

use tracing::debug;

use crate::events::{EventQueue, GraphEvent, ViewDelta};
use crate::geometry::Point;
use crate::graph_types::Graph;

/// What the pointer is currently doing
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    /// A node follows the pointer and is pinned while it does
    Dragging { node: String },
    /// The view is being dragged; `anchor` is the world point grabbed on press
    Panning { anchor: Point },
}

/// Selection set and pointer state for one view
#[derive(Debug, Default)]
pub struct InteractionController {
    state: PointerState,
    selection: BTreeSet<String>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Press: grab the node under the pointer, or start panning
    ///
    /// A press that arrives mid-drag (the host lost the release) first
    /// returns the dragged node to the simulation.
    pub fn on_pointer_down(&mut self, graph: &mut Graph, p: Point, events: &mut EventQueue) {
        self.release_drag(graph);

        let Some(index) = graph.node_at(p) else {
            self.clear_selection(graph);
            self.state = PointerState::Panning { anchor: p };
            return;
        };

        let id = graph.nodes()[index].id.clone();
        graph.nodes_mut()[index].fixed = true;

        if !self.is_selected(&id) {
            self.clear_selection(graph);
        }
        self.select_node(graph, &id, events);

        debug!(node = %id, "drag started");
        self.state = PointerState::Dragging { node: id };
    }

    /// Move: place the dragged node exactly, or report the pan offset
    ///
    /// The pan delta is measured from the grabbed anchor. A host that
    /// translates its view by the delta keeps the anchor under the pointer,
    /// and the next delta is relative to the updated view.
    pub fn on_pointer_move(&mut self, graph: &mut Graph, p: Point, events: &mut EventQueue) {
        match &self.state {
            PointerState::Idle => {}
            PointerState::Dragging { node } => {
                if let Some(node) = graph.node_mut(node) {
                    node.set_position(p);
                    node.vx = 0.0;
                    node.vy = 0.0;
                    events.push(GraphEvent::LayoutChanged);
                }
            }
            PointerState::Panning { anchor } => {
                let (dx, dy) = (p.x - anchor.x, p.y - anchor.y);
                if dx != 0.0 || dy != 0.0 {
                    events.push(GraphEvent::ViewChanged {
                        delta: ViewDelta::Pan { dx, dy },
                    });
                }
            }
        }
    }

    /// Release: return a dragged node to the simulation
    pub fn on_pointer_up(&mut self, graph: &mut Graph, _p: Point) {
        self.release_drag(graph);
    }

    fn release_drag(&mut self, graph: &mut Graph) {
        if let PointerState::Dragging { node } = std::mem::take(&mut self.state) {
            if let Some(node) = graph.node_mut(&node) {
                node.fixed = false;
                debug!(node = %node.id, "drag ended");
            }
        }
    }

    pub fn on_double_click(&mut self, graph: &Graph, p: Point, events: &mut EventQueue) {
        if let Some(index) = graph.node_at(p) {
            events.push(GraphEvent::NodeDoubleClicked {
                id: graph.nodes()[index].id.clone(),
            });
        }
    }

    /// Add a node to the selection; unknown ids are ignored
    pub fn select_node(&mut self, graph: &mut Graph, id: &str, events: &mut EventQueue) {
        let Some(node) = graph.node_mut(id) else {
            return;
        };
        node.selected = true;
        self.selection.insert(id.to_string());
        events.push(GraphEvent::NodeSelected { id: id.to_string() });
    }

    pub fn clear_selection(&mut self, graph: &mut Graph) {
        for id in std::mem::take(&mut self.selection) {
            if let Some(node) = graph.node_mut(&id) {
                node.selected = false;
            }
        }
    }

    /// Drop state that refers to nodes no longer in the graph
    pub fn reset(&mut self) {
        self.state = PointerState::Idle;
        self.selection.clear();
    }
}
