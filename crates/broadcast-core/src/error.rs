//! Error types for broadcast composition setup.
//!
//! Generation itself never fails: overflow is reported on the result.
//! These errors only arise while loading a catalog or configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`MessageCatalog`](crate::MessageCatalog).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog JSON could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Authored text gets longer as the level gets less verbose.
    #[error("{table} entry {key:?} grows from {from} to {to}")]
    NonMonotonic {
        table: &'static str,
        key: String,
        from: &'static str,
        to: &'static str,
    },

    /// The same authorization flag is listed twice.
    #[error("duplicate authorization flag: {0}")]
    DuplicateFlag(String),
}

/// Errors raised while reading generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held something other than a number.
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    /// A limit that must be positive was zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
