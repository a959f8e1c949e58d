//! Verbosity levels a message part can render at.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How much text a part contributes to the broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Long,
    Short,
    Minimal,
    None,
}

impl Level {
    /// Get the canonical tag for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
            Self::Minimal => "MINIMAL",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level ladder used by status, event, breached-list and requirement parts.
pub const STANDARD_LEVELS: &[Level] = &[Level::Long, Level::Short, Level::Minimal];

/// Level ladder for free text: all of it or nothing.
pub const OPTIONAL_LEVELS: &[Level] = &[Level::Long, Level::None];

/// Level ladder for a status part superseded by an event.
pub const SUPPRESSED_LEVELS: &[Level] = &[Level::None];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tags() {
        assert_eq!(Level::Long.to_string(), "LONG");
        assert_eq!(Level::Minimal.as_str(), "MINIMAL");
        assert_eq!(serde_json::to_string(&Level::None).unwrap(), "\"NONE\"");
    }

    #[test]
    fn test_ladders_start_most_verbose() {
        assert_eq!(STANDARD_LEVELS[0], Level::Long);
        assert_eq!(OPTIONAL_LEVELS.last(), Some(&Level::None));
        assert_eq!(SUPPRESSED_LEVELS, &[Level::None]);
    }
}
