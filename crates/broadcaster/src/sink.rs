//! Export destinations for finished broadcasts.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;

/// Trait for delivering a broadcast somewhere it can be pasted from.
///
/// Abstracted to support different destinations (stdout, files, tests, etc.)
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Deliver the complete message.
    async fn export(&self, message: &str) -> Result<()>;
}

/// A no-op sink for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

#[async_trait]
impl ExportSink for NoOpSink {
    async fn export(&self, _message: &str) -> Result<()> {
        Ok(())
    }
}

/// A sink that logs each exported message.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

#[async_trait]
impl ExportSink for LoggingSink {
    async fn export(&self, message: &str) -> Result<()> {
        info!(length = message.chars().count(), "Exporting broadcast: {}", message);
        Ok(())
    }
}

/// A sink that writes the message to a file, replacing its contents.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl ExportSink for FileSink {
    async fn export(&self, message: &str) -> Result<()> {
        tokio::fs::write(&self.path, message).await?;
        info!(path = %self.path.display(), "Broadcast written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpSink;

        // Should not error
        sink.export("/broadcast Site Status: CLEAR").await.unwrap();
    }

    #[tokio::test]
    async fn test_logging_sink() {
        let sink = LoggingSink;
        sink.export("/broadcast Site Status: CLEAR").await.unwrap();
        sink.export("").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_sink_writes_message() {
        let path = std::env::temp_dir().join(format!("broadcast-sink-{}.txt", std::process::id()));
        let sink = FileSink::new(&path);

        sink.export("/broadcast Site Status: CLEAR").await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "/broadcast Site Status: CLEAR");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_file_sink_reports_io_errors() {
        let sink = FileSink::new("/nonexistent-dir/broadcast.txt");
        let err = sink.export("x").await.unwrap_err();
        assert!(matches!(err, crate::ExportError::Sink(_)));
    }
}
