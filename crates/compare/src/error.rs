use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error produced when a comparison cannot be carried out.
#[derive(Debug, Error)]
pub enum CompareError {
    /// An operand expected to be a regular file is something else.
    #[error("'{}' is not a regular file", path.display())]
    NotARegularFile {
        /// Path with the wrong kind.
        path: PathBuf,
    },

    /// An operand expected to be a directory is something else.
    #[error("'{}' is not a directory", path.display())]
    NotADirectory {
        /// Path with the wrong kind.
        path: PathBuf,
    },

    /// The right-hand comparison root does not exist.
    #[error("'{}' does not exist", path.display())]
    Missing {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// A comparison root is a symbolic link.
    #[error("symlink not allowed here: '{}'", path.display())]
    SymlinkNotAllowed {
        /// The offending root.
        path: PathBuf,
    },

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

impl CompareError {
    pub(crate) fn io(action: &'static str, path: PathBuf, source: io::Error) -> Self {
        Self::Io {
            action,
            path,
            source,
        }
    }

    /// Reports whether this failure is a recoverable permission error.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == io::ErrorKind::PermissionDenied
        )
    }

    /// Reports whether this failure is a kind mismatch rather than an I/O
    /// fault.
    #[must_use]
    pub const fn is_kind_mismatch(&self) -> bool {
        matches!(
            self,
            Self::NotARegularFile { .. }
                | Self::NotADirectory { .. }
                | Self::Missing { .. }
                | Self::SymlinkNotAllowed { .. }
        )
    }
}
