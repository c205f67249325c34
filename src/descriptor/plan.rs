//! Buildpack plan parsing

use super::{load, parse};
use crate::error::BuildpackResult;
use serde::Deserialize;
use std::path::Path;

/// Parsed buildpack plan
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanDescriptor {
    #[serde(default)]
    pub entries: Vec<ConstraintEntry>,
}

/// A named requirement with its version range
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConstraintEntry {
    pub name: String,

    /// Range expression, e.g. `14.x`. Empty when the entry carries none.
    #[serde(default)]
    pub version: String,
}

impl PlanDescriptor {
    /// Load a plan from disk
    pub fn from_file(path: &Path) -> BuildpackResult<Self> {
        load(path)
    }

    /// Parse a plan from a TOML string
    pub fn parse(content: &str) -> BuildpackResult<Self> {
        parse(content, Path::new("plan.toml"))
    }
}
