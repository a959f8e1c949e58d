//! The rendered broadcast and its export gate.

use broadcast_core::{char_len, BroadcastResult};
use tracing::{info, warn};

use crate::error::{ExportError, Result};
use crate::sink::ExportSink;

/// Characters left below the limit at which the gauge turns to a warning.
pub const WARNING_MARGIN: usize = 50;

/// How close a message is to the character limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBand {
    Ok,
    Warning,
    Over,
}

impl LengthBand {
    pub fn classify(length: usize, limit: usize) -> Self {
        if length > limit {
            LengthBand::Over
        } else if length > limit.saturating_sub(WARNING_MARGIN) {
            LengthBand::Warning
        } else {
            LengthBand::Ok
        }
    }
}

/// What the user sees for one generated broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputView {
    text: String,
    overflow: bool,
    limit: usize,
}

impl OutputView {
    pub fn new(result: BroadcastResult, limit: usize) -> Self {
        Self {
            text: result.message,
            overflow: result.overflow,
            limit,
        }
    }

    /// The complete message, regardless of any reveal in progress.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn length(&self) -> usize {
        char_len(&self.text)
    }

    pub fn band(&self) -> LengthBand {
        LengthBand::classify(self.length(), self.limit)
    }

    /// Counter shown next to the output, e.g. `187/200`.
    pub fn counter(&self) -> String {
        format!("{}/{}", self.length(), self.limit)
    }

    /// Warning to display while the message overflows.
    pub fn warning(&self) -> Option<String> {
        self.overflow
            .then(|| format!("MESSAGE TOO LONG! Exceeds {} character limit.", self.limit))
    }

    /// Hand the message to `sink`, refusing empty or overflowing output.
    pub async fn export(&self, sink: &dyn ExportSink) -> Result<()> {
        if self.text.trim().is_empty() {
            warn!("Export blocked: no broadcast");
            return Err(ExportError::Empty);
        }
        if self.overflow {
            warn!(length = self.length(), limit = self.limit, "Export blocked: overflow");
            return Err(ExportError::Overflow {
                length: self.length(),
                limit: self.limit,
            });
        }

        sink.export(&self.text).await?;
        info!(length = self.length(), "Broadcast exported");
        Ok(())
    }
}
