//! Detect command - decide whether this buildpack applies

use crate::cli::args::DetectArgs;
use crate::config::Config;
use crate::detect::detect;
use crate::error::{BuildpackError, BuildpackResult};
use tracing::debug;

/// Execute the detect command
pub fn execute(args: DetectArgs, config: &Config) -> BuildpackResult<u8> {
    let app_dir = std::env::current_dir()
        .map_err(|e| BuildpackError::io("getting the working directory", e))?;
    debug!(platform = %args.platform.display(), app = %app_dir.display(), "running detection");

    let detection = detect(&app_dir, &args.plan, &config.detect)?;
    Ok(detection.exit_code())
}
