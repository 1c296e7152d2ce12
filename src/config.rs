//! Engine configuration
//!
//! A configuration is validated when it is built or loaded and is immutable
//! for the duration of a simulation run; it may be replaced wholesale.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{GraphError, GraphResult};
use crate::graph_types::NodeCategory;
use crate::io;
use crate::labels::LabelOptions;

/// Default spring constant
pub const DEFAULT_FORCE_STRENGTH: f32 = 0.1;

/// Default spring rest length
pub const DEFAULT_LINK_DISTANCE: f32 = 100.0;

/// Default repulsion coefficient (negative = repulsion)
pub const DEFAULT_CHARGE_STRENGTH: f32 = -300.0;

/// Default velocity damping applied after each integration step
pub const DEFAULT_DAMPING: f32 = 0.9;

/// Default pull toward the origin
pub const DEFAULT_CENTER_FORCE: f32 = 0.1;

/// Default average kinetic energy below which the layout is stable
pub const DEFAULT_SIMULATION_THRESHOLD: f32 = 0.1;

/// Default tick rate
pub const DEFAULT_MAX_FPS: u32 = 60;

/// Highest tick rate with a non-zero whole-millisecond interval
pub const MAX_FPS_LIMIT: u32 = 1000;

/// Node count above which real-time simulation is expected to lag
pub const DEFAULT_MAX_NODES_FOR_REALTIME: usize = 100;

/// Visual node size bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self {
            min: 20.0,
            max: 50.0,
        }
    }
}

impl SizeRange {
    pub fn as_tuple(&self) -> (f32, f32) {
        (self.min, self.max)
    }
}

/// Physics, scheduling and styling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Spring constant for edges (must be positive)
    pub force_strength: f32,
    /// Spring rest length
    pub link_distance: f32,
    /// Repulsion coefficient (negative = repulsion)
    pub charge_strength: f32,
    /// Velocity decay per tick (0-1)
    pub damping: f32,
    /// Centering coefficient
    pub center_force: f32,
    /// Average kinetic energy below which the layout is considered stable
    pub simulation_threshold: f32,
    /// Target tick rate
    pub max_fps: u32,
    /// Above this node count a lag warning is logged when simulation starts
    pub max_nodes_for_realtime: usize,
    pub node_size_range: SizeRange,
    pub labels: LabelOptions,
    pub node_colors: BTreeMap<NodeCategory, Color>,
    pub edge_color: Color,
    pub text_color: Color,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            force_strength: DEFAULT_FORCE_STRENGTH,
            link_distance: DEFAULT_LINK_DISTANCE,
            charge_strength: DEFAULT_CHARGE_STRENGTH,
            damping: DEFAULT_DAMPING,
            center_force: DEFAULT_CENTER_FORCE,
            simulation_threshold: DEFAULT_SIMULATION_THRESHOLD,
            max_fps: DEFAULT_MAX_FPS,
            max_nodes_for_realtime: DEFAULT_MAX_NODES_FOR_REALTIME,
            node_size_range: SizeRange::default(),
            labels: LabelOptions::default(),
            node_colors: default_node_colors(),
            edge_color: Color::rgb(0xBD, 0xC3, 0xC7),
            text_color: Color::rgb(0x2C, 0x3E, 0x50),
        }
    }
}

fn default_node_colors() -> BTreeMap<NodeCategory, Color> {
    BTreeMap::from([
        (NodeCategory::Character, Color::rgb(0x34, 0x98, 0xDB)),
        (NodeCategory::Location, Color::rgb(0x2E, 0xCC, 0x71)),
        (NodeCategory::Object, Color::rgb(0xF3, 0x9C, 0x12)),
        (NodeCategory::Lore, Color::rgb(0x9B, 0x59, 0xB6)),
        (NodeCategory::Subplot, Color::rgb(0xE7, 0x4C, 0x3C)),
        (NodeCategory::Other, Color::rgb(0x95, 0xA5, 0xA6)),
    ])
}

/// Grey used when neither the category nor OTHER has a configured color
const FALLBACK_NODE_COLOR: Color = Color::rgb(0x95, 0xA5, 0xA6);

impl GraphConfig {
    /// Load and validate a configuration file (`.yaml`, `.yml` or `.json`)
    pub fn from_path(path: &Path) -> GraphResult<Self> {
        let config: GraphConfig = io::read_document(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant, returning the first violation
    pub fn validate(&self) -> GraphResult<()> {
        let finite = [
            ("force_strength", self.force_strength),
            ("link_distance", self.link_distance),
            ("charge_strength", self.charge_strength),
            ("damping", self.damping),
            ("center_force", self.center_force),
            ("simulation_threshold", self.simulation_threshold),
            ("node_size_range", self.node_size_range.min),
            ("node_size_range", self.node_size_range.max),
        ];
        if let Some(&(field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GraphError::invalid(field, "must be a finite number"));
        }

        if self.force_strength <= 0.0 {
            return Err(GraphError::invalid("force_strength", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(GraphError::invalid("damping", "must be between 0 and 1"));
        }
        if self.charge_strength > 0.0 {
            return Err(GraphError::invalid(
                "charge_strength",
                "must not be positive (negative values repel)",
            ));
        }
        if self.link_distance < 0.0 {
            return Err(GraphError::invalid("link_distance", "must not be negative"));
        }
        if self.center_force < 0.0 {
            return Err(GraphError::invalid("center_force", "must not be negative"));
        }
        if self.simulation_threshold < 0.0 {
            return Err(GraphError::invalid(
                "simulation_threshold",
                "must not be negative",
            ));
        }
        if !(1..=MAX_FPS_LIMIT).contains(&self.max_fps) {
            return Err(GraphError::invalid(
                "max_fps",
                format!("must be between 1 and {MAX_FPS_LIMIT}"),
            ));
        }
        let SizeRange { min, max } = self.node_size_range;
        if min <= 0.0 || min > max {
            return Err(GraphError::invalid(
                "node_size_range",
                format!("must satisfy 0 < min <= max (got {min}..{max})"),
            ));
        }
        Ok(())
    }

    /// Milliseconds between ticks, never zero
    pub fn tick_interval_ms(&self) -> u64 {
        (1000 / self.max_fps.max(1)).max(1) as u64
    }

    /// Fill color for a category, falling back to OTHER
    pub fn node_color(&self, category: NodeCategory) -> Color {
        self.node_colors
            .get(&category)
            .or_else(|| self.node_colors.get(&NodeCategory::Other))
            .copied()
            .unwrap_or(FALLBACK_NODE_COLOR)
    }
}
