#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `meta` owns the side-effecting copy primitives of the `oc-mirror`
//! workspace: copy a file's bytes together with its permission bits and
//! modification time, stamp an existing entry with another entry's metadata,
//! and materialize missing directory chains while reproducing per-level
//! permission modes from the structurally corresponding source directories.
//!
//! # Design
//!
//! - [`copy_file_with_metadata`] is the single way file content reaches the
//!   target or a diff generation. It always transfers permission bits and
//!   timestamps in the same call, because the quick-check equality used by
//!   `compare` depends on the copied mtime being faithful.
//! - [`materialize_with_modes`] aligns the tails of the source and target
//!   paths. Levels inside the longest common trailing segment sequence are
//!   created with the mode of the matching source level; levels outside it
//!   fall back to default permissions, which is the documented fidelity limit
//!   when the two paths share no structure.
//! - All helpers are single-entry operations. Recursion over subtrees lives
//!   in the callers (`generations`, `engine`) so each crate walks with its
//!   own policy.
//!
//! # Errors
//!
//! Every failure is a [`MetaError::Io`] carrying the action, the path, and
//! the underlying error. [`MetaError::is_permission_denied`] lets callers
//! apply the inline permission-recovery policy without string matching.
//!
//! # See also
//!
//! - `engine` for the mutation sites built on these primitives.
//! - `generations` for the capture logic that mirrors subtrees into the
//!   diff root.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use filetime::FileTime;
use thiserror::Error;

/// Error produced when a copy or materialization step fails.
#[derive(Debug, Error)]
pub enum MetaError {
    /// Filesystem interaction failed.
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        /// Action being performed.
        action: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

impl MetaError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Reports whether this failure is a recoverable permission error.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        let Self::Io { source, .. } = self;
        source.kind() == io::ErrorKind::PermissionDenied
    }
}

/// Copies `source`'s bytes, permission bits, and timestamps to `destination`.
///
/// An existing destination file is overwritten in place.
pub fn copy_file_with_metadata(source: &Path, destination: &Path) -> Result<(), MetaError> {
    let metadata = fs::metadata(source)
        .map_err(|error| MetaError::io("inspect metadata for", source, error))?;
    fs::copy(source, destination)
        .map_err(|error| MetaError::io("copy file to", destination, error))?;
    apply_metadata(&metadata, destination)
}

/// Stamps `destination` with `source`'s permission bits and timestamps.
pub fn copy_metadata(source: &Path, destination: &Path) -> Result<(), MetaError> {
    let metadata = fs::metadata(source)
        .map_err(|error| MetaError::io("inspect metadata for", source, error))?;
    apply_metadata(&metadata, destination)
}

/// Creates `destination` as a directory carrying `source_dir`'s mode.
pub fn create_dir_with_mode(source_dir: &Path, destination: &Path) -> Result<(), MetaError> {
    let metadata = fs::metadata(source_dir)
        .map_err(|error| MetaError::io("inspect metadata for", source_dir, error))?;
    fs::create_dir(destination)
        .map_err(|error| MetaError::io("create directory", destination, error))?;
    fs::set_permissions(destination, metadata.permissions())
        .map_err(|error| MetaError::io("set permissions on", destination, error))
}

/// Creates every missing level of `target_dir`, copying modes where the
/// source structure lines up.
///
/// The longest common trailing segment sequence of `source_dir` and
/// `target_dir` determines which levels have a structural counterpart: those
/// are created with the corresponding source directory's mode, the rest with
/// default permissions. Existing levels are left untouched.
pub fn materialize_with_modes(source_dir: &Path, target_dir: &Path) -> Result<(), MetaError> {
    if target_dir.as_os_str().is_empty() || target_dir.is_dir() {
        return Ok(());
    }

    let source_chain = prefix_chain(source_dir);
    let target_chain = prefix_chain(target_dir);
    let shared = common_suffix_len(&source_chain, &target_chain);

    for (index, level) in target_chain.iter().enumerate() {
        if level.path.exists() {
            continue;
        }
        let from_end = target_chain.len() - 1 - index;
        let counterpart = if from_end < shared {
            source_chain
                .len()
                .checked_sub(1 + from_end)
                .map(|source_index| &source_chain[source_index].path)
        } else {
            None
        };
        match counterpart {
            Some(source_level) => create_dir_with_mode(source_level, &level.path)?,
            None => fs::create_dir(&level.path)
                .map_err(|error| MetaError::io("create directory", &level.path, error))?,
        }
    }
    Ok(())
}

struct PrefixLevel {
    path: PathBuf,
    name: std::ffi::OsString,
}

/// One entry per normal path component, each carrying the full prefix path
/// ending at that component.
fn prefix_chain(path: &Path) -> Vec<PrefixLevel> {
    let mut chain = Vec::new();
    let mut prefix = PathBuf::new();
    for component in path.components() {
        prefix.push(component.as_os_str());
        if let Component::Normal(name) = component {
            chain.push(PrefixLevel {
                path: prefix.clone(),
                name: name.to_os_string(),
            });
        }
    }
    chain
}

fn common_suffix_len(source: &[PrefixLevel], target: &[PrefixLevel]) -> usize {
    source
        .iter()
        .rev()
        .zip(target.iter().rev())
        .take_while(|(a, b)| a.name == b.name)
        .count()
}

fn apply_metadata(metadata: &fs::Metadata, destination: &Path) -> Result<(), MetaError> {
    fs::set_permissions(destination, metadata.permissions())
        .map_err(|error| MetaError::io("set permissions on", destination, error))?;
    let accessed = FileTime::from_last_access_time(metadata);
    let modified = FileTime::from_last_modification_time(metadata);
    filetime::set_file_times(destination, accessed, modified)
        .map_err(|error| MetaError::io("set modification time on", destination, error))
}
