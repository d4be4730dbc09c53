use std::io;
use std::path::PathBuf;

use meta::MetaError;
use thiserror::Error;

/// Error produced while rotating generations or capturing pre-change state.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The diff root exists but is not a directory.
    #[error("diff root '{}' is not a directory", path.display())]
    DiffRootNotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// A copy primitive failed.
    #[error(transparent)]
    Copy(#[from] MetaError),

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

impl GenerationError {
    pub(crate) fn io(action: &'static str, path: &std::path::Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Reports whether this failure is a recoverable permission error.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::DiffRootNotADirectory { .. } => false,
            Self::Copy(error) => error.is_permission_denied(),
            Self::Io { source, .. } => source.kind() == io::ErrorKind::PermissionDenied,
        }
    }

    /// Reports whether this failure is a filesystem-kind problem rather than
    /// an I/O fault.
    #[must_use]
    pub const fn is_kind_mismatch(&self) -> bool {
        matches!(self, Self::DiffRootNotADirectory { .. })
    }
}
