//! Error types for rendering and export.

use thiserror::Error;

/// Errors that can occur when exporting a rendered broadcast.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The message does not fit the character limit.
    #[error("MESSAGE TOO LONG! {length} characters exceeds the {limit} character limit")]
    Overflow { length: usize, limit: usize },

    /// There is nothing to export.
    #[error("No broadcast to export")]
    Empty,

    /// The export destination failed.
    #[error("Export failed: {0}")]
    Sink(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Sink(err.to_string())
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
