//! Artifact retrieval and installation
//!
//! Downloads the dependency archive and streams it into a layer directory.
//! Checksums declared in `buildpack.toml` are not checked here.

pub mod extract;
pub mod fetch;

pub use extract::{extract_tgz, EntryKind, ExtractSummary};
pub use fetch::{Fetcher, HttpFetcher, MemoryFetcher};

use crate::error::{BuildpackError, BuildpackResult};
use extract::Tripwire;
use std::path::Path;
use tracing::info;

/// Fetch `uri` and unpack it under `dest`.
///
/// Nothing is created on disk until the fetcher has produced a successful
/// response, so a rejected request leaves the layers directory untouched.
/// Read failures of the response body surface as `Fetch` errors.
pub fn install<F: Fetcher + ?Sized>(
    fetcher: &F,
    uri: &str,
    dest: &Path,
) -> BuildpackResult<ExtractSummary> {
    let body = fetcher.fetch(uri)?;

    std::fs::create_dir_all(dest).map_err(|e| BuildpackError::extract(dest, e))?;

    let (body, transport_failed) = Tripwire::new(body);
    let summary = extract_tgz(body, dest).map_err(|err| {
        if transport_failed.get() {
            BuildpackError::Fetch {
                uri: uri.to_string(),
                reason: err.to_string(),
            }
        } else {
            err
        }
    })?;

    info!(
        uri,
        dest = %dest.display(),
        files = summary.files,
        directories = summary.directories,
        "artifact installed"
    );
    Ok(summary)
}
