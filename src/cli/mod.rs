//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{multicall_args, BuildArgs, Cli, Commands, DetectArgs};
