//! Buildpack layers
//!
//! A layer is a directory under the lifecycle's layers dir plus a sibling
//! `<name>.toml` describing when the layer is visible.

pub mod metadata;

pub use metadata::LayerMetadata;

use std::path::{Path, PathBuf};

/// Location of a named layer inside the layers directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: String,
    root: PathBuf,
}

impl Layer {
    pub fn new(layers_dir: &Path, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: layers_dir.to_path_buf(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the layer contents are installed into
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    /// `<layers>/<name>.toml`
    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(format!("{}.toml", self.name))
    }
}
