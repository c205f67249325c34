//! Build command - install the Node.js layer

use crate::artifact::HttpFetcher;
use crate::build::{BuildContext, Builder};
use crate::cli::args::BuildArgs;
use crate::config::Config;
use crate::error::{BuildpackError, BuildpackResult};
use crate::ui::UiContext;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Execute the build command
pub fn execute(args: BuildArgs, config: &Config) -> BuildpackResult<u8> {
    let buildpack_toml = match args.buildpack_toml {
        Some(path) => path,
        None => default_buildpack_toml()?,
    };
    let app_dir = std::env::current_dir()
        .map_err(|e| BuildpackError::io("getting the working directory", e))?;
    debug!(buildpack_toml = %buildpack_toml.display(), "resolved buildpack.toml");

    let ctx = BuildContext {
        buildpack_toml,
        layers_dir: args.layers,
        platform_dir: args.platform,
        plan_path: args.plan,
        app_dir,
    };

    let ui = UiContext::detect();
    let fetcher = HttpFetcher::new(&config.http).with_ui(ui);
    let builder = Builder::new(fetcher)
        .with_layer_config(config.layer.clone())
        .with_ui(ui);

    match builder.build(&ctx) {
        Ok(_) => Ok(0),
        Err(failure) => {
            error!(stage = %failure.stage, "build stopped");
            if failure.error.is_transient() {
                warn!("the download may succeed if the build is retried");
            }
            Err(failure.error)
        }
    }
}

/// `buildpack.toml` for the executable that is running, located the way the
/// lifecycle lays buildpacks out: `<buildpack>/bin/build`.
fn default_buildpack_toml() -> BuildpackResult<PathBuf> {
    let argv0 = std::env::args_os().next().map(PathBuf::from).unwrap_or_default();
    let exe = if argv0.components().count() > 1 {
        std::path::absolute(&argv0)
    } else {
        std::env::current_exe()
    }
    .map_err(|e| BuildpackError::io("locating the buildpack executable", e))?;
    Ok(buildpack_toml_beside(&exe))
}

/// `<exe>/../../buildpack.toml`
pub fn buildpack_toml_beside(exe: &Path) -> PathBuf {
    exe.parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."))
        .join("buildpack.toml")
}
