//! Reveal timing loaded from environment variables.

use std::env;
use std::time::Duration;

use broadcast_core::ConfigError;
use rand::Rng;

use crate::typewriter::Step;

/// Chance that a typed character gets the extra jitter delay.
const JITTER_CHANCE: f64 = 0.15;

/// Typewriter timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealConfig {
    /// Delay after each typed character.
    pub type_delay: Duration,
    /// Delay after each deleted character.
    pub backspace_delay: Duration,
    /// Pause between deleting and typing.
    pub pause_delay: Duration,
    /// Extra delay occasionally added to a typed character.
    pub jitter: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            type_delay: Duration::from_millis(35),
            backspace_delay: Duration::from_millis(30),
            pause_delay: Duration::from_millis(80),
            jitter: Duration::from_millis(15),
        }
    }
}

impl RevealConfig {
    /// No delays at all; frames are still produced in order.
    pub fn instant() -> Self {
        Self {
            type_delay: Duration::ZERO,
            backspace_delay: Duration::ZERO,
            pause_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BROADCAST_TYPE_DELAY_MS` | Delay per typed character | `35` |
    /// | `BROADCAST_BACKSPACE_DELAY_MS` | Delay per deleted character | `30` |
    /// | `BROADCAST_PAUSE_DELAY_MS` | Pause between deleting and typing | `80` |
    /// | `BROADCAST_TYPE_JITTER_MS` | Occasional extra typing delay | `15` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |var: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(var) {
                Some(raw) if !raw.trim().is_empty() => raw
                    .trim()
                    .parse()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
                _ => Ok(default),
            }
        };

        Ok(Self {
            type_delay: millis("BROADCAST_TYPE_DELAY_MS", defaults.type_delay)?,
            backspace_delay: millis("BROADCAST_BACKSPACE_DELAY_MS", defaults.backspace_delay)?,
            pause_delay: millis("BROADCAST_PAUSE_DELAY_MS", defaults.pause_delay)?,
            jitter: millis("BROADCAST_TYPE_JITTER_MS", defaults.jitter)?,
        })
    }

    /// How long to hold a frame produced by `step`.
    pub fn delay_for(&self, step: Step) -> Duration {
        match step {
            Step::Backspace => self.backspace_delay,
            Step::Pause => self.pause_delay,
            Step::Type => {
                if !self.jitter.is_zero() && rand::thread_rng().gen_bool(JITTER_CHANCE) {
                    self.type_delay + self.jitter
                } else {
                    self.type_delay
                }
            }
        }
    }
}
