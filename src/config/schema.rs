//! Configuration schema
//!
//! Every section and field is optional; an empty file yields the defaults.

use crate::layer::LayerMetadata;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Artifact download settings
    pub http: HttpConfig,

    /// Layer naming and visibility
    pub layer: LayerConfig,

    /// Detection settings
    pub detect: DetectConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout; no timeout when unset
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with the download
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("node-buildpack/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Layer directory name; metadata goes to `<name>.toml`
    pub name: String,

    pub launch: bool,

    pub build: bool,

    pub cache: bool,
}

impl LayerConfig {
    /// The name must be a single plain path component so the layer and its
    /// metadata stay directly inside the layers directory.
    pub fn validate(&self) -> Result<(), String> {
        let mut components = Path::new(&self.name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == self.name.as_str() => Ok(()),
            _ => Err(format!(
                "layer.name '{}' must be a single directory name",
                self.name
            )),
        }
    }

    /// Flags to write into the layer metadata
    pub fn metadata(&self) -> LayerMetadata {
        LayerMetadata {
            launch: self.launch,
            build: self.build,
            cache: self.cache,
        }
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        let flags = LayerMetadata::launch_only();
        Self {
            name: "node".to_string(),
            launch: flags.launch,
            build: flags.build,
            cache: flags.cache,
        }
    }
}

/// Detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// `name` the application's package.json must carry
    pub app_name: String,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            app_name: "onboarding_app".to_string(),
        }
    }
}
