//! `buildpack.toml` parsing
//!
//! Only the identity and `[[metadata.dependencies]]` sections are modeled;
//! `[[order]]` is irrelevant for an implementation buildpack and is ignored.

use super::{load, parse};
use crate::error::{BuildpackError, BuildpackResult};
use serde::Deserialize;
use std::path::Path;

/// Parsed buildpack descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct BuildpackDescriptor {
    /// Buildpack identity
    pub buildpack: BuildpackInfo,

    /// Dependency catalog
    #[serde(default)]
    pub metadata: BuildpackMetadata,

    /// Stacks the buildpack runs on
    #[serde(default)]
    pub stacks: Vec<Stack>,
}

/// `[buildpack]` section
#[derive(Debug, Clone, Deserialize)]
pub struct BuildpackInfo {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub version: Option<String>,
}

/// `[metadata]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildpackMetadata {
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
}

/// `[[stacks]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct Stack {
    pub id: String,
}

/// One downloadable dependency
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyRecord {
    /// Dependency identifier
    pub id: String,

    /// Declared digest of the artifact. Carried but never verified.
    #[serde(default)]
    pub sha256: String,

    /// Stacks the artifact is built for
    #[serde(default)]
    pub stacks: Vec<String>,

    /// Where the `.tgz` artifact is downloaded from
    pub uri: String,

    /// Concrete semantic version of the artifact
    pub version: String,
}

impl BuildpackDescriptor {
    /// Load a descriptor from disk
    pub fn from_file(path: &Path) -> BuildpackResult<Self> {
        load(path)
    }

    /// Parse a descriptor from a TOML string
    pub fn parse(content: &str) -> BuildpackResult<Self> {
        parse(content, Path::new("buildpack.toml"))
    }

    /// The single dependency this buildpack supplies.
    ///
    /// Fails unless exactly one dependency is declared.
    pub fn dependency(&self) -> BuildpackResult<&DependencyRecord> {
        match self.metadata.dependencies.as_slice() {
            [only] => Ok(only),
            deps => Err(BuildpackError::DependencyCount { count: deps.len() }),
        }
    }
}
