//! Error types for the graph engine
//!
//! Configuration problems fail fast with a descriptive error. Data problems
//! (edges pointing at unknown nodes) never surface here; they are skipped
//! where they are encountered.

use thiserror::Error;

use crate::layout::LayoutAlgorithm;

/// Errors that can occur while configuring or running the engine
#[derive(Error, Debug)]
pub enum GraphError {
    /// A configuration value is outside its allowed range
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// The layout algorithm name is not recognised
    #[error("unknown layout algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The layout algorithm is named but not implemented
    #[error("layout algorithm not supported: {0}")]
    UnsupportedAlgorithm(LayoutAlgorithm),

    /// A tick produced a NaN or infinite position/velocity
    #[error("simulation diverged at node {node}")]
    NonFiniteState { node: String },

    /// The file format could not be determined from the path
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML document could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GraphError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        GraphError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations
pub type GraphResult<T> = Result<T, GraphError>;
