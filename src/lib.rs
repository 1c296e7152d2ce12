//! storygraph - Interactive layout and rendering engine for story relationship graphs.
//!
//! Characters, locations, objects and other story entities are laid out by a
//! force-directed or circular algorithm, drawn through a culling renderer and
//! manipulated with pointer input. The host drives everything from its own
//! frame loop through [`GraphEngine`].

pub mod camera;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod graph_types;
pub mod interaction;
pub mod io;
pub mod labels;
pub mod layout;
pub mod render;
pub mod simulation;

pub use camera::Camera;
pub use color::Color;
pub use config::GraphConfig;
pub use engine::GraphEngine;
pub use error::{GraphError, GraphResult};
pub use events::{GraphEvent, ViewDelta};
pub use graph_types::{EdgeSpec, Graph, GraphData, NodeCategory, NodeSpec};
pub use layout::LayoutAlgorithm;
pub use render::{DrawCommand, RecordingSurface, Surface};
pub use simulation::EngineInfo;
