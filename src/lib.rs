//! node-buildpack - Cloud Native Buildpack for Node.js
//!
//! Detects Node.js applications and, during build, installs the Node.js
//! runtime declared in `buildpack.toml` into a launch layer after checking it
//! against the version range recorded in the buildpack plan.

pub mod artifact;
pub mod build;
pub mod cli;
pub mod config;
pub mod constraint;
pub mod descriptor;
pub mod detect;
pub mod error;
pub mod layer;
pub mod ui;

#[cfg(test)]
mod testutil;

pub use error::{BuildpackError, BuildpackResult};
