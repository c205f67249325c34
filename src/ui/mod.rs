//! UI module for buildpack output
//!
//! The lifecycle captures stdout into the build log, so output is plain
//! stage headers with color only on a terminal. Progress bars are drawn to
//! stderr and only in interactive sessions.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{failure, stage, success};
pub use progress::DownloadProgress;
