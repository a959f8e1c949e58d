//! Error types for the command-line composer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can stop the CLI before a broadcast is produced.
#[derive(Debug, Error)]
pub enum CliError {
    /// Options input could not be read.
    #[error("Failed to read options from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Options input was not valid JSON.
    #[error("Invalid options JSON: {0}")]
    Options(#[from] serde_json::Error),

    /// Catalog override failed to load.
    #[error("Catalog error: {0}")]
    Catalog(#[from] broadcast_core::CatalogError),

    /// Environment configuration was invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] broadcast_core::ConfigError),

    /// Export was refused or failed.
    #[error(transparent)]
    Export(#[from] broadcaster::ExportError),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
