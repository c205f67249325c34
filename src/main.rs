//! node-buildpack entry point
//!
//! Dispatches to `detect` or `build`, either as subcommands or through
//! `bin/detect` / `bin/build` links.

use clap::Parser;
use node_buildpack::cli::{multicall_args, Cli, Commands};
use node_buildpack::config::ConfigManager;
use node_buildpack::error::BuildpackResult;
use node_buildpack::ui;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_from(multicall_args(std::env::args_os()));

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("node_buildpack=warn"),
        1 => EnvFilter::new("node_buildpack=info"),
        _ => EnvFilter::new("node_buildpack=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            ui::failure(&e.to_string(), e.hint());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> BuildpackResult<u8> {
    let config_manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;
    debug!(config = ?config_manager.path(), "configuration loaded");

    match cli.command {
        Commands::Detect(args) => node_buildpack::cli::commands::detect(args, &config),
        Commands::Build(args) => node_buildpack::cli::commands::build(args, &config),
    }
}
