//! Streaming `.tgz` extraction
//!
//! Entries are read one at a time from the gzip/tar stream and written under
//! the destination as they arrive. There is no staging directory: a failure
//! part-way leaves the entries written so far in place.

use crate::error::{BuildpackError, BuildpackResult};
use flate2::read::GzDecoder;
use std::cell::Cell;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;
use tar::{Archive, Entry, EntryType};
use tracing::{debug, warn};

/// What an archive entry turned into on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    /// Skipped: hard links, devices, fifos, global headers
    Other,
}

/// Counts of what an extraction produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub directories: usize,
    pub files: usize,
    pub symlinks: usize,
    pub skipped: usize,
}

impl ExtractSummary {
    fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Directory => self.directories += 1,
            EntryKind::File => self.files += 1,
            EntryKind::Symlink => self.symlinks += 1,
            EntryKind::Other => self.skipped += 1,
        }
    }
}

/// Reader adapter that remembers whether the wrapped reader ever failed.
///
/// Lets the caller tell which layer of a stacked stream (transport, gzip,
/// tar) an `io::Error` originated from.
pub(crate) struct Tripwire<R> {
    inner: R,
    tripped: Rc<Cell<bool>>,
}

impl<R: Read> Tripwire<R> {
    pub(crate) fn new(inner: R) -> (Self, Rc<Cell<bool>>) {
        let tripped = Rc::new(Cell::new(false));
        (
            Self {
                inner,
                tripped: Rc::clone(&tripped),
            },
            tripped,
        )
    }
}

impl<R: Read> Read for Tripwire<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).inspect_err(|_| self.tripped.set(true))
    }
}

/// Decompress a gzip stream and unpack the tar inside it under `dest`.
///
/// Errors raised by the gzip layer become `Decompress`; malformed tar
/// structure, unsafe paths, and filesystem failures become `Extract`.
pub fn extract_tgz<R: Read>(reader: R, dest: &Path) -> BuildpackResult<ExtractSummary> {
    let (gunzip, gunzip_failed) = Tripwire::new(GzDecoder::new(reader));
    let classify = |err: io::Error| {
        if gunzip_failed.get() {
            BuildpackError::Decompress {
                reason: err.to_string(),
            }
        } else {
            BuildpackError::extract(dest, err)
        }
    };

    let root = fs::canonicalize(dest).map_err(|e| BuildpackError::extract(dest, e))?;
    let mut archive = Archive::new(gunzip);
    let mut summary = ExtractSummary::default();
    for entry in archive.entries().map_err(classify)? {
        let mut entry = entry.map_err(classify)?;
        let kind = unpack_entry(&mut entry, dest, &root).map_err(classify)?;
        summary.record(kind);
    }

    debug!(dest = %dest.display(), ?summary, "archive extracted");
    Ok(summary)
}

fn unpack_entry<R: Read>(entry: &mut Entry<'_, R>, dest: &Path, root: &Path) -> io::Result<EntryKind> {
    let archive_path = entry.path()?.into_owned();
    let relative = safe_relative_path(&archive_path)?;
    if relative.as_os_str().is_empty() {
        // The archive root itself, e.g. `./`
        return Ok(EntryKind::Directory);
    }
    let target = dest.join(&relative);
    ensure_contained(dest, root, &relative)?;

    let kind = match entry.header().entry_type() {
        EntryType::Directory => {
            fs::create_dir_all(&target)?;
            EntryKind::Directory
        }
        EntryType::Regular | EntryType::Continuous => {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            if fs::symlink_metadata(&target).is_ok_and(|m| m.file_type().is_symlink()) {
                fs::remove_file(&target)?;
            }
            let mut file = File::create(&target)?;
            io::copy(entry, &mut file)?;
            apply_mode(&file, entry.header().mode().ok())?;
            EntryKind::File
        }
        EntryType::Symlink => {
            let link = entry.link_name()?.ok_or_else(|| {
                invalid(format!("symlink {} has no target", archive_path.display()))
            })?;
            if link.is_absolute() || escapes_root(&relative, &link) {
                return Err(invalid(format!(
                    "symlink {} points outside the archive: {}",
                    archive_path.display(),
                    link.display()
                )));
            }
            create_symlink(&link, &target)?;
            EntryKind::Symlink
        }
        other => {
            warn!(path = %archive_path.display(), entry_type = ?other, "skipping unsupported archive entry");
            EntryKind::Other
        }
    };

    debug!(path = %relative.display(), ?kind, "unpacked archive entry");
    Ok(kind)
}

/// Normalize an archive path, rejecting anything that could leave `dest`.
fn safe_relative_path(path: &Path) -> io::Result<PathBuf> {
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid(format!(
                    "unsafe path in archive: {}",
                    path.display()
                )));
            }
        }
    }
    Ok(relative)
}

/// Refuse entries whose parent directories pass through a symlink that
/// resolves outside `root`, the canonical form of `dest`.
///
/// Link targets are checked lexically when written; this catches chains of
/// individually harmless links that escape together.
fn ensure_contained(dest: &Path, root: &Path, relative: &Path) -> io::Result<()> {
    let Some(parent) = relative.parent() else {
        return Ok(());
    };
    let mut current = dest.to_path_buf();
    for component in parent.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let resolved = fs::canonicalize(&current)?;
                if !resolved.starts_with(root) {
                    return Err(invalid(format!(
                        "{} resolves outside the archive root: {}",
                        relative.display(),
                        resolved.display()
                    )));
                }
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => break,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Whether a relative link target climbs above the archive root when
/// resolved from the link's own directory.
fn escapes_root(link_path: &Path, target: &Path) -> bool {
    let mut depth = link_path.components().count().saturating_sub(1) as isize;
    for component in target.components() {
        match component {
            Component::ParentDir => depth -= 1,
            Component::Normal(_) => depth += 1,
            _ => {}
        }
        if depth < 0 {
            return true;
        }
    }
    false
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[cfg(unix)]
fn apply_mode(file: &File, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    match mode {
        Some(mode) => file.set_permissions(fs::Permissions::from_mode(mode & 0o777)),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn apply_mode(_file: &File, _mode: Option<u32>) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn create_symlink(link: &Path, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::symlink_metadata(target).is_ok() {
        fs::remove_file(target)?;
    }
    std::os::unix::fs::symlink(link, target)
}

#[cfg(not(unix))]
fn create_symlink(link: &Path, target: &Path) -> io::Result<()> {
    warn!(link = %link.display(), target = %target.display(), "symlinks are not supported on this platform");
    Ok(())
}
