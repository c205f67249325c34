//! Layer content metadata (`<layer>.toml`)
//!
//! Only the three visibility flags are modeled. The file is always rewritten
//! from scratch; whatever the platform restored from a previous build is
//! discarded.

use crate::error::{BuildpackError, BuildpackResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Visibility flags for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMetadata {
    /// Available in the final application image
    pub launch: bool,

    /// Available to subsequent buildpacks during the build
    pub build: bool,

    /// Restored by the platform on the next build
    pub cache: bool,
}

impl LayerMetadata {
    /// Visible at runtime only
    pub const fn launch_only() -> Self {
        Self {
            launch: true,
            build: false,
            cache: false,
        }
    }

    /// Render as TOML, flags in `launch`, `build`, `cache` order
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Create or truncate `path` and write the flags
    pub fn write(&self, path: &Path) -> BuildpackResult<()> {
        let write_err = |source: std::io::Error| BuildpackError::Write {
            path: path.to_path_buf(),
            source,
        };

        let content = self.to_toml().map_err(|e| write_err(std::io::Error::other(e)))?;
        let mut file = File::create(path).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        debug!(path = %path.display(), launch = self.launch, build = self.build, cache = self.cache, "wrote layer metadata");
        Ok(())
    }
}

impl Default for LayerMetadata {
    fn default() -> Self {
        Self::launch_only()
    }
}
