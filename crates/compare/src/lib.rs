#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `compare` is the read-only half of the mirroring pipeline: it decides
//! whether two files count as equal and classifies the children of a
//! directory pair. Nothing in this crate mutates the filesystem, which keeps
//! the comparison logic independently testable against throwaway trees.
//!
//! # Design
//!
//! - [`files_equal`] implements the metadata quick-check: two regular files
//!   are equal iff their byte sizes match and their modification times match
//!   after truncation to microsecond resolution. Content is never read.
//! - [`compare_dirs`] scans one directory level on each side and produces a
//!   [`DirDiff`] with seven classification sets. Recursion across levels is
//!   the engine's job; the diff itself is strictly single-level.
//! - Symbolic links are excluded at the scan: a symlinked child appears in no
//!   set at all. Only the two root arguments are checked for being symlinks,
//!   and a symlink root is an error.
//!
//! # Invariants
//!
//! - Within each type (directory/file), the classification sets are pairwise
//!   disjoint and their union covers every non-symlink child present on
//!   either side.
//! - The sets carry no defined ordering; consumers must treat them as
//!   unordered.
//! - Equality truncates to whole microseconds by floor division, never
//!   rounding, so a reconciled file whose stored mtime lost sub-microsecond
//!   precision still compares equal to its source.
//!
//! # Errors
//!
//! [`CompareError`] reports kind mismatches ("not a regular file", "not a
//! directory"), a missing right-hand root, symlink roots, and I/O failures
//! with the offending path attached.
//!
//! # Examples
//!
//! ```
//! use compare::compare_dirs;
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let left = temp.path().join("left");
//! let right = temp.path().join("right");
//! fs::create_dir(&left)?;
//! fs::create_dir(&right)?;
//! fs::write(left.join("new.txt"), b"data")?;
//!
//! let diff = compare_dirs(&left, &right)?;
//! assert_eq!(diff.files_only_left.len(), 1);
//! assert!(diff.files_only_right.is_empty());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```
//!
//! # See also
//!
//! - `engine` for the recursive walk that applies a [`DirDiff`] per level.

mod dir;
mod error;
mod quick;

pub use dir::{DirDiff, compare_dirs};
pub use error::CompareError;
pub use quick::files_equal;
