//! Graph engine facade
//!
//! [`GraphEngine`] is what a host embeds: it owns the simulation, the
//! interaction state and the outbound event queue, and exposes the whole
//! boundary (data, algorithm selection, simulation control, pointer input,
//! rendering and diagnostics) as plain method calls.
//!
//! ```
//! use std::time::Duration;
//! use storygraph::{GraphConfig, GraphEngine, NodeSpec, EdgeSpec, RecordingSurface};
//! use storygraph::geometry::Rect;
//!
//! let mut engine = GraphEngine::new(GraphConfig::default())?;
//! engine.set_data(
//!     vec![NodeSpec::new("aria"), NodeSpec::new("castle")],
//!     vec![EdgeSpec::new("aria", "castle").with_label("lives in")],
//! );
//! engine.tick(Duration::from_millis(16));
//!
//! let mut surface = RecordingSurface::new();
//! engine.render(&mut surface, Rect::new(-400.0, -300.0, 800.0, 600.0));
//! for event in engine.drain_events() {
//!     println!("{event:?}");
//! }
//! # Ok::<(), storygraph::GraphError>(())
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::GraphConfig;
use crate::error::GraphResult;
use crate::events::{EventQueue, GraphEvent};
use crate::geometry::{Point, Rect};
use crate::graph_types::{EdgeSpec, Graph, GraphData, NodeSpec};
use crate::interaction::InteractionController;
use crate::layout::LayoutAlgorithm;
use crate::render::{RenderStats, Renderer, Surface};
use crate::simulation::{EngineInfo, SimulationController};

/// Interactive layout and rendering engine for one graph view
#[derive(Debug)]
pub struct GraphEngine {
    simulation: SimulationController,
    interaction: InteractionController,
    events: EventQueue,
}

impl GraphEngine {
    pub fn new(config: GraphConfig) -> GraphResult<Self> {
        Ok(Self {
            simulation: SimulationController::new(config)?,
            interaction: InteractionController::new(),
            events: EventQueue::new(),
        })
    }

    pub fn config(&self) -> &GraphConfig {
        self.simulation.config()
    }

    /// Replace the configuration; node sizes pick up a new size range on the
    /// next `set_data`
    pub fn set_config(&mut self, config: GraphConfig) -> GraphResult<()> {
        self.simulation.set_config(config)
    }

    /// Replace the working graph and (re)start the simulation
    pub fn set_data(&mut self, nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) {
        let size_range = self.config().node_size_range.as_tuple();
        let graph = Graph::from_specs(nodes, edges, size_range);
        self.interaction.reset();
        self.simulation.start_simulation(graph, &mut self.events);
    }

    pub fn load(&mut self, data: GraphData) {
        self.set_data(data.nodes, data.edges);
    }

    /// Switch algorithms by name; with data loaded the layout restarts
    pub fn set_layout_algorithm(&mut self, name: &str) -> GraphResult<()> {
        self.simulation.set_layout_algorithm(name)?;
        if !self.simulation.graph().is_empty() {
            self.simulation.restart(&mut self.events);
        }
        Ok(())
    }

    pub fn algorithm(&self) -> LayoutAlgorithm {
        self.simulation.algorithm()
    }

    /// Resume ticking from the current positions
    pub fn start_simulation(&mut self) {
        self.simulation.resume(&mut self.events);
    }

    pub fn stop_simulation(&mut self) {
        self.simulation.stop_simulation();
    }

    pub fn toggle_simulation(&mut self) {
        if self.simulation.is_running() {
            self.stop_simulation();
        } else {
            self.start_simulation();
        }
    }

    /// Re-seed positions with the active algorithm and resume
    pub fn refresh_layout(&mut self) {
        self.simulation.restart(&mut self.events);
    }

    /// Advance by the time elapsed since the previous call; returns steps run
    pub fn tick(&mut self, elapsed: Duration) -> u32 {
        self.simulation.tick(elapsed, &mut self.events)
    }

    /// Run one step immediately, ignoring the tick rate
    pub fn step(&mut self) -> bool {
        self.simulation.step(&mut self.events)
    }

    pub fn run_to_convergence(&mut self, max_steps: u64) -> u64 {
        self.simulation.run_to_convergence(max_steps, &mut self.events)
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.interaction.on_pointer_down(
            self.simulation.graph_mut(),
            Point::new(x, y),
            &mut self.events,
        );
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.interaction.on_pointer_move(
            self.simulation.graph_mut(),
            Point::new(x, y),
            &mut self.events,
        );
    }

    pub fn on_pointer_up(&mut self, x: f32, y: f32) {
        self.interaction
            .on_pointer_up(self.simulation.graph_mut(), Point::new(x, y));
    }

    pub fn on_double_click(&mut self, x: f32, y: f32) {
        self.interaction
            .on_double_click(self.simulation.graph(), Point::new(x, y), &mut self.events);
    }

    pub fn select_node(&mut self, id: &str) {
        self.interaction
            .select_node(self.simulation.graph_mut(), id, &mut self.events);
    }

    pub fn clear_selection(&mut self) {
        self.interaction.clear_selection(self.simulation.graph_mut());
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        self.interaction.selection()
    }

    pub fn toggle_labels(&mut self) {
        self.simulation.labels_mut().toggle();
    }

    pub fn set_edge_labels(&mut self, visible: bool) {
        self.simulation.labels_mut().edge_labels = visible;
    }

    /// Draw the graph; `visible` is the world region the host is showing
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, visible: Rect) -> RenderStats {
        Renderer::new(self.config()).render(surface, visible, self.simulation.graph())
    }

    /// Take every event raised since the previous drain
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        self.events.drain()
    }

    pub fn info(&self) -> EngineInfo {
        self.simulation.info()
    }

    pub fn graph(&self) -> &Graph {
        self.simulation.graph()
    }

    /// Bounding box of all node circles, for fitting a camera
    pub fn content_bounds(&self) -> Option<Rect> {
        self.simulation.graph().bounds()
    }
}
