//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use broadcast_core::GeneratorConfig;
use broadcaster::RevealConfig;

use crate::error::Result;

/// Composer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Budget and fitting limits.
    pub generator: GeneratorConfig,
    /// Typewriter timing for `--animate`.
    pub reveal: RevealConfig,
    /// Catalog override file.
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Generator and reveal variables are documented on [`GeneratorConfig::from_env`]
    /// and [`RevealConfig::from_env`]. In addition:
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BROADCAST_CATALOG` | Catalog override JSON file | (stock catalog) |
    pub fn from_env() -> Result<Self> {
        let generator = GeneratorConfig::from_env()?;
        let reveal = RevealConfig::from_env()?;

        let catalog_path = env::var("BROADCAST_CATALOG")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            generator,
            reveal,
            catalog_path,
        })
    }
}
