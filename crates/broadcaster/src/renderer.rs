//! Ties a generated broadcast to its animated display.

use broadcast_core::BroadcastResult;
use tokio::sync::watch;
use tracing::debug;

use crate::config::RevealConfig;
use crate::error::{ExportError, Result};
use crate::output::OutputView;
use crate::sink::ExportSink;
use crate::typewriter::Typewriter;

/// Displays successive broadcasts and gates their export.
///
/// Each call to [`show`](Self::show) replaces the current view and starts a
/// reveal from whatever is on screen, superseding any reveal still running.
pub struct Renderer {
    typewriter: Typewriter,
    view: Option<OutputView>,
    limit: usize,
}

impl Renderer {
    pub fn new(config: RevealConfig, limit: usize) -> Self {
        Self {
            typewriter: Typewriter::new(config),
            view: None,
            limit,
        }
    }

    /// Show a new result with a typewriter reveal.
    pub fn show(&mut self, result: BroadcastResult) {
        debug!(overflow = result.overflow, "Rendering broadcast");
        let view = OutputView::new(result, self.limit);
        self.typewriter.reveal(view.text());
        self.view = Some(view);
    }

    /// Show a new result without animation.
    pub fn show_instant(&mut self, result: BroadcastResult) {
        let view = OutputView::new(result, self.limit);
        self.typewriter.show_instant(view.text());
        self.view = Some(view);
    }

    /// The latest result, if any has been shown.
    pub fn view(&self) -> Option<&OutputView> {
        self.view.as_ref()
    }

    /// Text currently on screen, which may be mid-reveal.
    pub fn displayed(&self) -> String {
        self.typewriter.text()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.typewriter.subscribe()
    }

    pub fn is_revealing(&self) -> bool {
        self.typewriter.is_revealing()
    }

    /// Wait for the current reveal to complete.
    pub async fn finish(&mut self) {
        self.typewriter.finish().await;
    }

    /// Export the latest complete message; an in-progress reveal does not matter.
    pub async fn export(&self, sink: &dyn ExportSink) -> Result<()> {
        match &self.view {
            Some(view) => view.export(sink).await,
            None => Err(ExportError::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NoOpSink;
    use async_trait::async_trait;
    use broadcast_core::{generate, BroadcastOptions};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        exported: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ExportSink for RecordingSink {
        async fn export(&self, message: &str) -> Result<()> {
            self.exported.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_show_reveals_generated_message() {
        let mut renderer = Renderer::new(RevealConfig::instant(), 200);
        let result = generate(&BroadcastOptions::new().with_status("CLEAR"));
        let expected = result.message.clone();

        renderer.show(result);
        renderer.finish().await;

        assert_eq!(renderer.displayed(), expected);
        assert_eq!(renderer.view().unwrap().text(), expected);
    }

    #[tokio::test]
    async fn test_latest_result_wins() {
        let mut renderer = Renderer::new(RevealConfig::instant(), 200);
        renderer.show(generate(&BroadcastOptions::new().with_status("CLEAR")));
        let second = generate(&BroadcastOptions::new().with_status("MAINTENANCE"));
        let expected = second.message.clone();

        renderer.show(second);
        renderer.finish().await;
        assert_eq!(renderer.displayed(), expected);
    }

    #[tokio::test]
    async fn test_export_before_anything_shown() {
        let renderer = Renderer::new(RevealConfig::instant(), 200);
        let err = renderer.export(&NoOpSink).await.unwrap_err();
        assert!(matches!(err, ExportError::Empty));
    }

    #[tokio::test]
    async fn test_export_mid_reveal_uses_full_message() {
        let config = RevealConfig {
            type_delay: std::time::Duration::from_millis(20),
            ..RevealConfig::instant()
        };
        let mut renderer = Renderer::new(config, 200);
        let result = generate(&BroadcastOptions::new().with_status("CLEAR"));
        let expected = result.message.clone();
        renderer.show(result);

        assert!(renderer.is_revealing());
        assert_ne!(renderer.displayed(), expected);

        let sink = RecordingSink::default();
        renderer.export(&sink).await.unwrap();
        assert_eq!(*sink.exported.lock().unwrap(), vec![expected]);
    }

    #[tokio::test]
    async fn test_overflow_blocks_export() {
        let mut renderer = Renderer::new(RevealConfig::instant(), 200);
        renderer.show_instant(BroadcastResult {
            message: "x".repeat(250),
            overflow: true,
        });

        assert!(renderer.view().unwrap().warning().is_some());
        let err = renderer.export(&NoOpSink).await.unwrap_err();
        assert!(matches!(err, ExportError::Overflow { length: 250, .. }));
        assert_eq!(renderer.displayed().len(), 250);
    }
}
