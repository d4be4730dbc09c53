#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` decides which source-only entries are exempt from creation
//! during a mirror run. An [`ExclusionSet`] is built once per invocation from
//! two lists: exact paths (compared after lexical absolutization) and exact
//! basenames. It is immutable afterwards and consulted by the engine before
//! every first-time creation.
//!
//! # Design
//!
//! - Matching is exact on both axes. A path entry matches one specific
//!   filesystem location; a name entry matches any entry whose final
//!   component equals the keyword, at any depth. There is no glob or suffix
//!   matching: the historical variant that compared keywords as
//!   `/`-prefixed path suffixes silently widened keywords into patterns and
//!   is deliberately not reproduced.
//! - The working directory is captured at construction so relative exclusion
//!   arguments and relative candidates resolve against the same base for the
//!   whole run, independent of later process state.
//! - Exclusions gate creation only. The engine never consults the set when
//!   updating or deleting entries that already exist in the target, so an
//!   exclusion added after a subtree was mirrored does not orphan it.
//!
//! # Examples
//!
//! ```
//! use filters::ExclusionSet;
//! use std::ffi::OsString;
//! use std::path::{Path, PathBuf};
//!
//! let set = ExclusionSet::new(
//!     [PathBuf::from("/data/cache")],
//!     [OsString::from(".git")],
//! ).unwrap();
//!
//! assert!(set.should_skip(Path::new("/data/cache"), "cache".as_ref()));
//! assert!(set.should_skip(Path::new("/work/repo/.git"), ".git".as_ref()));
//! assert!(!set.should_skip(Path::new("/data/cache2"), "cache2".as_ref()));
//! ```
//!
//! # See also
//!
//! - `engine` for the creation sites that consult [`ExclusionSet::should_skip`].

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

use core::paths::absolutize_lexical;

/// Immutable set of exact paths and basenames exempt from creation.
#[derive(Clone, Debug, Default)]
pub struct ExclusionSet {
    cwd: PathBuf,
    paths: Vec<PathBuf>,
    names: Vec<OsString>,
}

impl ExclusionSet {
    /// Builds the set from raw exclusion arguments.
    ///
    /// Path entries are absolutized lexically against the current working
    /// directory; name entries are kept verbatim.
    pub fn new(
        paths: impl IntoIterator<Item = PathBuf>,
        names: impl IntoIterator<Item = OsString>,
    ) -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        let paths = paths
            .into_iter()
            .map(|path| absolutize_lexical(&cwd, &path))
            .collect();
        Ok(Self {
            cwd,
            paths,
            names: names.into_iter().collect(),
        })
    }

    /// Reports whether the set excludes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.names.is_empty()
    }

    /// Decides whether a source-only creation candidate is exempt.
    ///
    /// `candidate` is the source path of the entry; `name` is its final
    /// component.
    #[must_use]
    pub fn should_skip(&self, candidate: &Path, name: &OsStr) -> bool {
        if self.names.iter().any(|keyword| keyword == name) {
            return true;
        }
        if self.paths.is_empty() {
            return false;
        }
        let resolved = absolutize_lexical(&self.cwd, candidate);
        self.paths.iter().any(|path| *path == resolved)
    }
}
