//! Label visibility options
//!
//! Controls which text the renderer draws on top of nodes and edges.

use serde::{Deserialize, Serialize};

/// Label visibility options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOptions {
    /// Master toggle; when off no label is drawn regardless of the others
    pub enabled: bool,
    /// Draw node labels below each node
    pub node_labels: bool,
    /// Draw edge labels at each edge midpoint
    pub edge_labels: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            node_labels: true,
            edge_labels: false,
        }
    }
}

impl LabelOptions {
    /// Check if node labels should be drawn
    pub fn show_node_labels(&self) -> bool {
        self.enabled && self.node_labels
    }

    /// Check if edge labels should be drawn
    pub fn show_edge_labels(&self) -> bool {
        self.enabled && self.edge_labels
    }

    /// Flip the master toggle
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Set the master toggle
    pub fn set_enabled(&mut self, visible: bool) {
        self.enabled = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_node_labels_only() {
        let opts = LabelOptions::default();
        assert!(opts.show_node_labels());
        assert!(!opts.show_edge_labels());
    }

    #[test]
    fn master_toggle_overrides_individual_flags() {
        let mut opts = LabelOptions {
            edge_labels: true,
            ..Default::default()
        };
        opts.toggle();

        assert!(opts.node_labels);
        assert!(opts.edge_labels);
        assert!(!opts.show_node_labels());
        assert!(!opts.show_edge_labels());

        opts.set_enabled(true);
        assert!(opts.show_node_labels());
        assert!(opts.show_edge_labels());
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let opts: LabelOptions = serde_json::from_str(r#"{"edge_labels": true}"#).unwrap();
        assert!(opts.enabled);
        assert!(opts.node_labels);
        assert!(opts.edge_labels);
    }
}
