//! Configuration management
//!
//! Settings come from an optional TOML file named on the command line or via
//! `NODE_BUILDPACK_CONFIG`. Without one, the defaults reproduce the stock
//! buildpack behavior.

pub mod schema;

pub use schema::Config;

use crate::error::{BuildpackError, BuildpackResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Manager that always yields the defaults
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load(&self) -> BuildpackResult<Config> {
        match &self.config_path {
            Some(path) if path.exists() => Self::load_from_file(path),
            Some(path) => {
                debug!("Config file {} not found, using defaults", path.display());
                Ok(Config::default())
            }
            None => Ok(Config::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> BuildpackResult<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BuildpackError::io(format!("reading config from {}", path.display()), e))?;

        let config: Config = toml::from_str(&content).map_err(|e| BuildpackError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config
            .layer
            .validate()
            .map_err(|reason| BuildpackError::ConfigInvalid {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(config)
    }

    /// Get the config file path
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
