//! Broadcast rendering for terminals and other displays.
//!
//! This crate sits between [`broadcast_core`] and whatever shows the message:
//!
//! - [`Typewriter`] - Diff-based reveal that supersedes itself on new input
//! - [`OutputView`] - Complete message, length gauge and overflow warning
//! - [`Renderer`] - Combines the two for successive results
//! - [`ExportSink`] - Where an exported broadcast goes; export is refused on overflow
//!
//! # Example
//!
//! ```no_run
//! use broadcast_core::{generate, BroadcastOptions};
//! use broadcaster::{LoggingSink, Renderer, RevealConfig};
//!
//! # async fn example() -> Result<(), broadcaster::ExportError> {
//! let mut renderer = Renderer::new(RevealConfig::default(), 200);
//! renderer.show(generate(&BroadcastOptions::new().with_status("CLEAR")));
//! renderer.finish().await;
//!
//! renderer.export(&LoggingSink).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod output;
mod renderer;
mod sink;
mod typewriter;

pub use config::RevealConfig;
pub use error::{ExportError, Result};
pub use output::{LengthBand, OutputView, WARNING_MARGIN};
pub use renderer::Renderer;
pub use sink::{ExportSink, FileSink, LoggingSink, NoOpSink};
pub use typewriter::{reveal_frames, Frame, Step, Typewriter};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
