//! Generator configuration.

use std::env;

use crate::error::ConfigError;

/// Default character budget for a broadcast.
pub const DEFAULT_MAX_CHARS: usize = 200;

/// Default cap on shrink and expand iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Default number of numeric tokens that switches rendering to names and counts.
pub const DEFAULT_NUMERIC_THRESHOLD: usize = 3;

/// Configuration for [`BroadcastGenerator`](crate::BroadcastGenerator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Maximum message length in characters, prefix included.
    pub max_chars: usize,
    /// Iteration cap applied separately to the shrink and expand phases.
    pub max_iterations: usize,
    /// Numeric token count at which number-free rendering kicks in.
    /// Zero disables the check.
    pub numeric_threshold: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
        }
    }
}

impl GeneratorConfig {
    /// Create a config with a custom character budget.
    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BROADCAST_MAX_CHARS` | Character budget | `200` |
    /// | `BROADCAST_MAX_ITERATIONS` | Shrink/expand iteration cap | `50` |
    /// | `BROADCAST_NUMERIC_THRESHOLD` | Numeric tokens before number-free mode (0 = off) | `3` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |var: &'static str, default: usize| -> Result<usize, ConfigError> {
            match lookup(var) {
                Some(raw) if !raw.trim().is_empty() => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
                _ => Ok(default),
            }
        };

        let config = Self {
            max_chars: read("BROADCAST_MAX_CHARS", defaults.max_chars)?,
            max_iterations: read("BROADCAST_MAX_ITERATIONS", defaults.max_iterations)?,
            numeric_threshold: read("BROADCAST_NUMERIC_THRESHOLD", defaults.numeric_threshold)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject limits the fitting loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chars == 0 {
            return Err(ConfigError::Zero("BROADCAST_MAX_CHARS"));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Zero("BROADCAST_MAX_ITERATIONS"));
        }
        Ok(())
    }
}
