//! Notifications from the engine to the host
//!
//! Events are queued as they happen and drained by the host once per frame.

use std::collections::VecDeque;

use serde::Serialize;

/// A change in the host's view transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewDelta {
    /// Translate the view by this many world units
    Pan { dx: f32, dy: f32 },
}

/// Notifications raised by the simulation and interaction controllers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GraphEvent {
    /// Node positions changed (every tick, and while dragging)
    LayoutChanged,
    /// Stability flipped; only raised on a transition
    StabilityChanged { stable: bool },
    NodeSelected { id: String },
    NodeDoubleClicked { id: String },
    ViewChanged { delta: ViewDelta },
}

/// Outbound event queue
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GraphEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GraphEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<GraphEvent> {
        self.events.drain(..).collect()
    }
}
