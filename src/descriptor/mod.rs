//! Descriptor loading
//!
//! `buildpack.toml` declares the buildpack identity and the dependency it can
//! supply; the buildpack plan carries the version constraints produced by
//! detection. Both are read whole and parsed into plain records.

pub mod buildpack;
pub mod plan;

pub use buildpack::{BuildpackDescriptor, BuildpackInfo, DependencyRecord};
pub use plan::{ConstraintEntry, PlanDescriptor};

use crate::error::{BuildpackError, BuildpackResult};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a TOML descriptor from disk and deserialize it.
fn load<T: DeserializeOwned>(path: &Path) -> BuildpackResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| BuildpackError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse(&content, path)
}

/// Deserialize TOML content, attributing failures to `origin`.
fn parse<T: DeserializeOwned>(content: &str, origin: &Path) -> BuildpackResult<T> {
    toml::from_str(content).map_err(|e| BuildpackError::parse(origin, e))
}
