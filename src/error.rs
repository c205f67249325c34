//! Error types for the buildpack
//!
//! All modules use `BuildpackResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status reported for every failed build and for failed detection.
pub const FAILURE_EXIT_CODE: u8 = 100;

/// Result type alias for buildpack operations
pub type BuildpackResult<T> = Result<T, BuildpackError>;

/// All errors that can occur while detecting or building
#[derive(Error, Debug)]
pub enum BuildpackError {
    // Descriptor errors
    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to decode {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("unexpected number of dependencies in buildpack.toml: expected 1, found {count}")]
    DependencyCount { count: usize },

    // Resolution errors
    #[error("unable to find a '{name}' version constraint in the buildpack plan")]
    ConstraintNotFound { name: String },

    #[error("invalid version range '{range}' in buildpack plan: {reason}")]
    InvalidRange { range: String, reason: String },

    #[error("unable to parse buildpack.toml version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("no match for version constraint in buildpack.toml: {version} does not satisfy '{range}'")]
    VersionMismatch { version: String, range: String },

    // Artifact errors
    #[error("fetching {uri} failed: {reason}")]
    Fetch { uri: String, reason: String },

    #[error("fetching {uri} failed: invalid response status {status}")]
    FetchStatus { uri: String, status: u16 },

    #[error("unable to decompress archive: {reason}")]
    Decompress { reason: String },

    #[error("unable to extract archive into {path}: {reason}")]
    Extract { path: PathBuf, reason: String },

    // Layer errors
    #[error("unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // Detection errors
    #[error("unable to decode package.json at {path}: {reason}")]
    PackageJson { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BuildpackError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for a file
    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an extraction error rooted at a destination path
    pub fn extract(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Extract {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Process exit status for this error.
    ///
    /// An unmet version constraint and an I/O failure deliberately share the
    /// same status.
    pub fn exit_code(&self) -> u8 {
        FAILURE_EXIT_CODE
    }

    /// Check if the error came from the network or archive stream
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::FetchStatus { .. } | Self::Decompress { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConstraintNotFound { .. } => {
                Some("Declare the runtime in package.json, e.g. \"engines\": { \"node\": \"14.x\" }")
            }
            Self::VersionMismatch { .. } => {
                Some("Relax the engines.node range in package.json or update buildpack.toml")
            }
            Self::DependencyCount { .. } => {
                Some("buildpack.toml must declare exactly one [[metadata.dependencies]] entry")
            }
            Self::FetchStatus { .. } | Self::Fetch { .. } => {
                Some("Check the dependency uri in buildpack.toml and network access")
            }
            _ => None,
        }
    }
}
