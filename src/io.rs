//! Document loading with format dispatch on file extension
//!
//! Configuration files may be YAML or JSON; graph documents are JSON in
//! practice but go through the same dispatch.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{GraphError, GraphResult};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// File extensions handled by this format
    pub fn supported_extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
        }
    }

    /// Check if this format handles the given extension (case-insensitive)
    pub fn supports_extension(&self, ext: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Determine the format from a path's extension
    pub fn from_path(path: &Path) -> GraphResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| GraphError::UnsupportedFormat(path.display().to_string()))?;

        [Format::Json, Format::Yaml]
            .into_iter()
            .find(|f| f.supports_extension(ext))
            .ok_or_else(|| GraphError::UnsupportedFormat(ext.to_string()))
    }

    /// Parse a document from text
    pub fn parse<T: DeserializeOwned>(&self, text: &str) -> GraphResult<T> {
        Ok(match self {
            Format::Json => serde_json::from_str(text)?,
            Format::Yaml => serde_yaml::from_str(text)?,
        })
    }
}

/// Read and parse a document, choosing the format from its extension
pub fn read_document<T: DeserializeOwned>(path: &Path) -> GraphResult<T> {
    let format = Format::from_path(path)?;
    let text = fs::read_to_string(path)?;
    format.parse(&text)
}
