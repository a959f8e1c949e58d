//! Site broadcast composition.
//!
//! This crate turns a set of form selections into a single `/broadcast`
//! command that fits a fixed character budget. It defines:
//!
//! - [`BroadcastOptions`] - The selections (status, threat, testing, events, breaches, requirements, free text)
//! - [`MessagePart`] / [`PartKind`] - Body sections, each renderable at several [`Level`]s
//! - [`MessageCatalog`] - Canned text, suppression rules and priorities
//! - [`BroadcastGenerator`] - The shrink-then-expand fitting algorithm
//! - [`BroadcastResult`] - The message plus an overflow flag
//!
//! Generation is pure: no I/O, no shared state, same input gives the same output.
//!
//! # Example
//!
//! ```rust
//! use broadcast_core::{generate, BroadcastOptions};
//!
//! let options = BroadcastOptions::new()
//!     .with_status("SCP BREACH")
//!     .with_alarm("HIGH")
//!     .with_event("076 EVENT");
//!
//! let result = generate(&options);
//! assert!(!result.overflow);
//! assert!(result.message.starts_with("/broadcast Site Status: SCP BREACH | Threat: HIGH"));
//! assert!(result.message.contains("SCP-076 containment breach"));
//! ```

mod catalog;
mod config;
mod error;
mod generator;
mod level;
mod numeric;
mod options;
mod part;

use std::sync::OnceLock;

pub use catalog::{
    AuthorizationItem, LeveledText, MessageCatalog, Priorities, SuppressionRule, ITEMS_PLACEHOLDER,
};
pub use config::{
    GeneratorConfig, DEFAULT_MAX_CHARS, DEFAULT_MAX_ITERATIONS, DEFAULT_NUMERIC_THRESHOLD,
};
pub use error::{CatalogError, ConfigError};
pub use generator::{char_len, BroadcastGenerator, BroadcastResult, SEPARATOR};
pub use level::{Level, OPTIONAL_LEVELS, STANDARD_LEVELS, SUPPRESSED_LEVELS};
pub use numeric::{count_numeric_tokens, NumericGuard};
pub use options::{normalize_key, BroadcastOptions, Requirements, UNSET};
pub use part::{MessagePart, PartKind, RenderContext, Requirement};

/// Compose a broadcast with the default budget and stock catalog.
pub fn generate(options: &BroadcastOptions) -> BroadcastResult {
    static DEFAULT: OnceLock<BroadcastGenerator> = OnceLock::new();
    DEFAULT.get_or_init(BroadcastGenerator::default).generate(options)
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
