//! Detection phase
//!
//! Passes when the application's `package.json` carries the configured app
//! name, and records in the build plan that this buildpack provides `node`
//! and that the app requires the range from `engines.node`.

use crate::config::schema::DetectConfig;
use crate::constraint::NODE_ENTRY;
use crate::error::{BuildpackError, BuildpackResult, FAILURE_EXIT_CODE};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Range recorded when `package.json` has no `engines.node`
const ANY_VERSION: &str = "*";

/// Detection outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Pass,
    Fail,
}

impl Detection {
    pub fn exit_code(&self) -> u8 {
        match self {
            Detection::Pass => 0,
            Detection::Fail => FAILURE_EXIT_CODE,
        }
    }
}

/// Build plan written by detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    #[serde(default)]
    pub provides: Vec<Provide>,

    #[serde(default, rename = "require")]
    pub requires: Vec<Require>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provide {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Require {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    engines: Engines,
}

#[derive(Debug, Default, Deserialize)]
struct Engines {
    #[serde(default)]
    node: Option<String>,
}

/// Inspect `app_dir` and, on a match, write the build plan to `plan_path`
pub fn detect(app_dir: &Path, plan_path: &Path, config: &DetectConfig) -> BuildpackResult<Detection> {
    let manifest_path = app_dir.join("package.json");
    let content = match std::fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %manifest_path.display(), "no package.json, failing detection");
            return Ok(Detection::Fail);
        }
        Err(e) => {
            return Err(BuildpackError::Read {
                path: manifest_path,
                source: e,
            })
        }
    };

    let manifest: PackageJson =
        serde_json::from_str(&content).map_err(|e| BuildpackError::PackageJson {
            path: manifest_path.clone(),
            reason: e.to_string(),
        })?;

    if manifest.name.as_deref() != Some(config.app_name.as_str()) {
        debug!(name = ?manifest.name, expected = %config.app_name, "package.json name does not match");
        return Ok(Detection::Fail);
    }

    let version = manifest
        .engines
        .node
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| ANY_VERSION.to_string());

    let plan = BuildPlan {
        provides: vec![Provide {
            name: NODE_ENTRY.to_string(),
        }],
        requires: vec![Require {
            name: NODE_ENTRY.to_string(),
            version,
        }],
    };
    write_plan(&plan, plan_path)?;

    info!(plan = %plan_path.display(), "detection passed");
    Ok(Detection::Pass)
}

fn write_plan(plan: &BuildPlan, path: &Path) -> BuildpackResult<()> {
    let content = toml::to_string(plan).map_err(|e| BuildpackError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    std::fs::write(path, content).map_err(|e| BuildpackError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
