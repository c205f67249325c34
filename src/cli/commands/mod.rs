//! CLI command implementations
//!
//! Each command returns the process exit status for a completed run; errors
//! are reported by `main`.

pub mod build;
pub mod detect;

pub use build::execute as build;
pub use detect::execute as detect;
