//! Single-level directory comparison.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::CompareError;
use crate::quick::metadata_equal;

/// Classification of one directory pair's children.
///
/// Each child name lands in exactly one set for its type. Symlinked children
/// are absent from every set. The vectors reflect directory-scan order, which
/// is platform-dependent; treat them as unordered.
#[derive(Debug, Default)]
pub struct DirDiff {
    /// Subdirectories present only under the left root.
    pub dirs_only_left: Vec<OsString>,
    /// Names that are a directory on the left and present on the right.
    pub dirs_in_both: Vec<OsString>,
    /// Subdirectories present only under the right root.
    pub dirs_only_right: Vec<OsString>,
    /// Files present only under the left root.
    pub files_only_left: Vec<OsString>,
    /// Files present on both sides with matching size and truncated mtime.
    pub files_equal: Vec<OsString>,
    /// Files present on both sides with diverging metadata.
    pub files_different: Vec<OsString>,
    /// Files present only under the right root.
    pub files_only_right: Vec<OsString>,
}

impl DirDiff {
    /// Reports whether the pair needs no mutation at this level.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.dirs_only_left.is_empty()
            && self.dirs_only_right.is_empty()
            && self.files_only_left.is_empty()
            && self.files_different.is_empty()
            && self.files_only_right.is_empty()
    }
}

/// Compares the immediate children of `left` and `right`.
///
/// `left` must be a directory, `right` must exist and be a directory, and
/// neither root may itself be a symbolic link. Children that are symlinks on
/// either side are silently excluded from the result.
pub fn compare_dirs(left: &Path, right: &Path) -> Result<DirDiff, CompareError> {
    if !left.is_dir() {
        return Err(CompareError::NotADirectory {
            path: left.to_path_buf(),
        });
    }
    if !right.exists() {
        return Err(CompareError::Missing {
            path: right.to_path_buf(),
        });
    }
    if !right.is_dir() {
        return Err(CompareError::NotADirectory {
            path: right.to_path_buf(),
        });
    }
    for root in [left, right] {
        let metadata = fs::symlink_metadata(root).map_err(|source| {
            CompareError::io("inspect metadata for", root.to_path_buf(), source)
        })?;
        if metadata.file_type().is_symlink() {
            return Err(CompareError::SymlinkNotAllowed {
                path: root.to_path_buf(),
            });
        }
    }

    let mut diff = DirDiff::default();
    let right_entries = scan_dir(right)?;

    // Stat map for right-hand files so left-side classification reuses the
    // scan results instead of issuing another round of syscalls.
    let mut right_file_stats: HashMap<OsString, fs::Metadata> = HashMap::new();
    for (name, file_type, entry) in &right_entries {
        if file_type.is_file() {
            let metadata = entry.metadata().map_err(|source| {
                CompareError::io("inspect metadata for", entry.path(), source)
            })?;
            right_file_stats.insert(name.clone(), metadata);
        }
    }

    let mut all_left: HashSet<OsString> = HashSet::new();
    for (name, file_type, entry) in scan_dir(left)? {
        all_left.insert(name.clone());
        if file_type.is_dir() {
            if right.join(&name).exists() {
                diff.dirs_in_both.push(name);
            } else {
                diff.dirs_only_left.push(name);
            }
        } else if file_type.is_file() {
            match right_file_stats.get(&name) {
                Some(right_meta) => {
                    let left_meta = entry.metadata().map_err(|source| {
                        CompareError::io("inspect metadata for", entry.path(), source)
                    })?;
                    if metadata_equal(&left_meta, right_meta) {
                        diff.files_equal.push(name);
                    } else {
                        diff.files_different.push(name);
                    }
                }
                None => diff.files_only_left.push(name),
            }
        }
    }

    // Anything on the right that the left side does not know.
    for (name, file_type, _) in right_entries {
        if all_left.contains(&name) {
            continue;
        }
        if file_type.is_dir() {
            diff.dirs_only_right.push(name);
        } else if file_type.is_file() {
            diff.files_only_right.push(name);
        }
    }

    Ok(diff)
}

/// Scans one directory, dropping symlinked children on the spot.
fn scan_dir(dir: &Path) -> Result<Vec<(OsString, fs::FileType, fs::DirEntry)>, CompareError> {
    let mut entries = Vec::new();
    let reader = fs::read_dir(dir)
        .map_err(|source| CompareError::io("read directory", dir.to_path_buf(), source))?;
    for entry in reader {
        let entry = entry
            .map_err(|source| CompareError::io("read entry in", dir.to_path_buf(), source))?;
        let file_type = entry
            .file_type()
            .map_err(|source| CompareError::io("inspect metadata for", entry.path(), source))?;
        if file_type.is_symlink() {
            continue;
        }
        entries.push((entry.file_name(), file_type, entry));
    }
    Ok(entries)
}
