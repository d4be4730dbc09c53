//! Lexical path helpers shared across the workspace.
//!
//! Exclusion matching and capture-path mirroring both need an absolute form
//! of a path that may not exist, so resolution here is purely textual: no
//! symlink traversal, no filesystem access.

use std::path::{Component, Path, PathBuf};

/// Anchors `path` at `base` and folds `.` and `..` components lexically.
///
/// `..` segments at the root are dropped, matching the usual lexical
/// normalization of absolute paths.
#[must_use]
pub fn absolutize_lexical(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(segment) => resolved.push(segment),
        }
    }
    resolved
}

/// Strips the root and prefix components, leaving the normal segments.
///
/// Mirroring an absolute path under another directory needs the path in
/// relative form; `/data/project` becomes `data/project`.
#[must_use]
pub fn relative_form(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .collect()
}
