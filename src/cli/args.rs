//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// node-buildpack - Cloud Native Buildpack for Node.js
///
/// Detects Node.js applications and installs the Node.js runtime
/// declared in buildpack.toml into a launch layer.
#[derive(Parser, Debug)]
#[command(name = "node-buildpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NODE_BUILDPACK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decide whether the application in the working directory is a Node.js app
    Detect(DetectArgs),

    /// Install the Node.js runtime layer
    Build(BuildArgs),
}

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Platform directory
    pub platform: PathBuf,

    /// Build plan to write
    pub plan: PathBuf,
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Layers directory
    pub layers: PathBuf,

    /// Platform directory
    pub platform: PathBuf,

    /// Buildpack plan produced after detection
    pub plan: PathBuf,

    /// buildpack.toml to read (defaults to ../buildpack.toml next to bin/)
    #[arg(long, env = "NODE_BUILDPACK_TOML")]
    pub buildpack_toml: Option<PathBuf>,
}

/// Support running as `bin/detect` / `bin/build`.
///
/// When the program is invoked through a file named after a subcommand, that
/// subcommand is inserted so clap sees `node-buildpack build ...`.
pub fn multicall_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();
    let implied = args
        .first()
        .and_then(|argv0| Path::new(argv0).file_stem())
        .and_then(|stem| stem.to_str())
        .filter(|stem| matches!(*stem, "build" | "detect"))
        .map(OsString::from);

    if let Some(subcommand) = implied {
        args.insert(1, subcommand);
    }
    args
}
