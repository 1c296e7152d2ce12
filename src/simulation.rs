//! Simulation controller
//!
//! Owns the working graph and the active layout algorithm, and advances the
//! layout at the configured tick rate. There is no timer thread: the host
//! calls [`SimulationController::tick`] from its own frame loop with the time
//! elapsed since the previous call.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::GraphConfig;
use crate::error::GraphResult;
use crate::events::{EventQueue, GraphEvent};
use crate::graph_types::Graph;
use crate::labels::LabelOptions;
use crate::layout::{Layout, LayoutAlgorithm, LayoutEngine};

/// Upper bound on steps run by one `tick` call; any older backlog is dropped
pub const MAX_STEPS_PER_TICK: u32 = 5;

/// Read-only diagnostics for debug overlays and tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub algorithm: LayoutAlgorithm,
    /// Steps run since the simulation was last (re)started
    pub tick_count: u64,
    pub is_stable: bool,
    pub is_running: bool,
    pub node_count: usize,
    pub edge_count: usize,
}

impl fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_stable {
            "stable"
        } else if self.is_running {
            "running"
        } else {
            "stopped"
        };
        writeln!(f, "nodes: {}", self.node_count)?;
        writeln!(f, "edges: {}", self.edge_count)?;
        writeln!(f, "algorithm: {}", self.algorithm)?;
        writeln!(f, "ticks: {}", self.tick_count)?;
        write!(f, "state: {state}")
    }
}

/// Drives the active layout algorithm over the working graph
#[derive(Debug)]
pub struct SimulationController {
    config: GraphConfig,
    layout: LayoutEngine,
    graph: Graph,
    running: bool,
    is_stable: bool,
    tick_count: u64,
    /// Elapsed time not yet consumed by a step
    pending: Duration,
}

impl SimulationController {
    /// Create a controller; the configuration is validated first
    pub fn new(config: GraphConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            layout: LayoutEngine::default(),
            graph: Graph::default(),
            running: false,
            is_stable: false,
            tick_count: 0,
            pending: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Replace the configuration wholesale
    pub fn set_config(&mut self, config: GraphConfig) -> GraphResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Label toggles can change at any time without revalidation
    pub fn labels_mut(&mut self) -> &mut LabelOptions {
        &mut self.config.labels
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn algorithm(&self) -> LayoutAlgorithm {
        self.layout.algorithm()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_stable(&self) -> bool {
        self.is_stable
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Swap the layout algorithm, keeping current node positions
    ///
    /// The new algorithm seeds positions only when the simulation is next
    /// (re)started.
    pub fn set_layout_algorithm(&mut self, name: &str) -> GraphResult<()> {
        let algorithm: LayoutAlgorithm = name.parse()?;
        self.layout = LayoutEngine::for_algorithm(algorithm)?;
        info!(%algorithm, "layout algorithm changed");
        Ok(())
    }

    /// Replace the working graph and start simulating it
    ///
    /// An empty graph is stored but not simulated.
    pub fn start_simulation(&mut self, graph: Graph, events: &mut EventQueue) {
        self.graph = graph;
        self.restart(events);
    }

    /// Re-seed positions with the active algorithm and start ticking
    pub fn restart(&mut self, events: &mut EventQueue) {
        self.tick_count = 0;
        if self.graph.is_empty() {
            self.stop_simulation();
            self.set_stable(false, events);
            return;
        }

        if self.graph.node_count() > self.config.max_nodes_for_realtime {
            warn!(
                nodes = self.graph.node_count(),
                limit = self.config.max_nodes_for_realtime,
                "graph exceeds real-time node budget; ticks may overrun the frame"
            );
        }

        self.layout.initialize_positions(&mut self.graph);
        self.resume(events);
        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            algorithm = %self.algorithm(),
            "physics simulation started"
        );
    }

    /// Start ticking from the current positions without re-seeding
    pub fn resume(&mut self, events: &mut EventQueue) {
        if self.graph.is_empty() {
            return;
        }
        self.running = true;
        self.pending = Duration::ZERO;
        self.set_stable(false, events);
    }

    /// Stop ticking; positions are left as they are
    pub fn stop_simulation(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
    }

    /// Account for `elapsed` time and run every step that became due
    ///
    /// Returns the number of steps run.
    pub fn tick(&mut self, elapsed: Duration, events: &mut EventQueue) -> u32 {
        if !self.running {
            return 0;
        }

        let interval = Duration::from_millis(self.config.tick_interval_ms());
        self.pending += elapsed;

        let mut steps = 0;
        while self.running && self.pending >= interval && steps < MAX_STEPS_PER_TICK {
            self.pending -= interval;
            self.step(events);
            steps += 1;
        }
        if steps == MAX_STEPS_PER_TICK {
            self.pending = Duration::ZERO;
        }
        steps
    }

    /// Run exactly one step if the simulation is running
    ///
    /// Returns whether a step ran. A failing step is logged and stops the
    /// simulation; positions are kept so the last frame can still be drawn.
    pub fn step(&mut self, events: &mut EventQueue) -> bool {
        if !self.running {
            return false;
        }

        self.tick_count += 1;
        match self.layout.calculate_forces(&mut self.graph, &self.config) {
            Ok(stable) => {
                self.set_stable(stable, events);
                if stable {
                    self.running = false;
                    info!(ticks = self.tick_count, "physics simulation reached stability");
                }
                events.push(GraphEvent::LayoutChanged);
            }
            Err(err) => {
                error!(error = %err, tick = self.tick_count, "physics simulation step failed");
                self.stop_simulation();
            }
        }
        true
    }

    /// Step until stable, stopped, or `max_steps` have run; returns steps run
    pub fn run_to_convergence(&mut self, max_steps: u64, events: &mut EventQueue) -> u64 {
        let mut steps = 0;
        while steps < max_steps && self.step(events) {
            steps += 1;
        }
        steps
    }

    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            algorithm: self.algorithm(),
            tick_count: self.tick_count,
            is_stable: self.is_stable,
            is_running: self.running,
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
        }
    }

    fn set_stable(&mut self, stable: bool, events: &mut EventQueue) {
        if stable != self.is_stable {
            self.is_stable = stable;
            events.push(GraphEvent::StabilityChanged { stable });
        }
    }
}
