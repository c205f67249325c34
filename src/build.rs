//! Build orchestration
//!
//! Runs the build phase as a fixed sequence of stages:
//! `Loading → Resolving → Fetching → Writing → Done`. The first failing stage
//! ends the build; the failure records which stage it came from.

use crate::artifact::{self, ExtractSummary, Fetcher};
use crate::config::schema::LayerConfig;
use crate::constraint::Resolution;
use crate::descriptor::{BuildpackDescriptor, PlanDescriptor};
use crate::error::{BuildpackError, BuildpackResult};
use crate::layer::Layer;
use crate::ui::{self, UiContext};
use semver::Version;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Resolving,
    Fetching,
    Writing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "loading descriptors",
            Stage::Resolving => "resolving version constraint",
            Stage::Fetching => "installing dependency",
            Stage::Writing => "writing layer metadata",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Inputs handed to the build phase by the lifecycle
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The buildpack's own `buildpack.toml`
    pub buildpack_toml: PathBuf,

    /// Directory the layer and its metadata are written into
    pub layers_dir: PathBuf,

    /// Platform configuration; not consulted by this buildpack
    pub platform_dir: PathBuf,

    /// Buildpack plan written after detection
    pub plan_path: PathBuf,

    /// Application source; not consulted by this buildpack
    pub app_dir: PathBuf,
}

/// What a successful build produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub dependency_id: String,
    pub version: Version,
    pub layer: Layer,
    pub extracted: ExtractSummary,
}

/// A build that stopped at `stage`
#[derive(Debug, Error)]
#[error("{stage}: {error}")]
pub struct BuildFailure {
    pub stage: Stage,
    #[source]
    pub error: BuildpackError,
}

impl BuildFailure {
    pub fn exit_code(&self) -> u8 {
        self.error.exit_code()
    }
}

/// Drives one build with an injected artifact fetcher
pub struct Builder<F> {
    fetcher: F,
    layer: LayerConfig,
    ui: UiContext,
}

impl<F: Fetcher> Builder<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            layer: LayerConfig::default(),
            ui: UiContext::non_interactive(),
        }
    }

    /// Override the layer name and visibility flags
    pub fn with_layer_config(mut self, layer: LayerConfig) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_ui(mut self, ui: UiContext) -> Self {
        self.ui = ui;
        self
    }

    /// Run every stage in order, stopping at the first failure
    pub fn build(&self, ctx: &BuildContext) -> Result<BuildReport, BuildFailure> {
        let mut stage = Stage::Loading;
        self.run(ctx, &mut stage).map_err(|error| {
            error!(stage = ?stage, error = %error, "build failed");
            BuildFailure { stage, error }
        })
    }

    fn run(&self, ctx: &BuildContext, stage: &mut Stage) -> BuildpackResult<BuildReport> {
        ui::stage(&self.ui, "Decoding buildpack.toml file");
        let descriptor = BuildpackDescriptor::from_file(&ctx.buildpack_toml)?;
        let dependency = descriptor.dependency()?;
        let plan = PlanDescriptor::from_file(&ctx.plan_path)?;
        info!(
            buildpack = %descriptor.buildpack.id,
            dependency = %dependency.id,
            declared = %dependency.version,
            "descriptors loaded"
        );

        *stage = Stage::Resolving;
        let version = Resolution::evaluate(&plan.entries, &dependency.version)?.require()?;

        *stage = Stage::Fetching;
        ui::stage(&self.ui, &format!("Downloading {} dependency", self.layer.name));
        let layer = Layer::new(&ctx.layers_dir, self.layer.name.as_str());
        let extracted = artifact::install(&self.fetcher, &dependency.uri, &layer.path())?;

        *stage = Stage::Writing;
        ui::stage(&self.ui, &format!("Writing {}.toml file", layer.name()));
        self.layer.metadata().write(&layer.metadata_path())?;

        *stage = Stage::Done;
        ui::success(&self.ui, "Success!");
        info!(version = %version, layer = %layer.path().display(), "build complete");

        Ok(BuildReport {
            dependency_id: dependency.id.clone(),
            version,
            layer,
            extracted,
        })
    }
}
