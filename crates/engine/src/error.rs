use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use compare::CompareError;
use core::exit_code::{ExitCode, HasExitCode};
use generations::GenerationError;
use meta::MetaError;

/// Error produced when a mirror run cannot continue.
///
/// Recoverable conditions (permission failures on individual entries, kind
/// collisions below the invocation root) never surface through this type;
/// the walker absorbs them and records the skip in the summary. Whatever
/// does surface here aborts the run.
#[derive(Debug)]
pub struct SyncError {
    kind: SyncErrorKind,
}

impl SyncError {
    fn new(kind: SyncErrorKind) -> Self {
        Self { kind }
    }

    /// Constructs a rotation failure.
    #[must_use]
    pub fn rotation(source: GenerationError) -> Self {
        Self::new(SyncErrorKind::Rotation(source))
    }

    /// Constructs an I/O error with action context.
    #[must_use]
    pub fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::new(SyncErrorKind::Io {
            action,
            path: path.to_path_buf(),
            source,
        })
    }

    /// Constructs a wrong-filesystem-kind error.
    #[must_use]
    pub fn wrong_kind(path: &Path, expected: &'static str) -> Self {
        Self::new(SyncErrorKind::WrongKind {
            path: path.to_path_buf(),
            expected,
        })
    }

    /// Constructs a diagnostics-channel failure.
    #[must_use]
    pub fn log(source: io::Error) -> Self {
        Self::new(SyncErrorKind::Log { source })
    }

    /// Provides access to the underlying error kind.
    #[must_use]
    pub fn kind(&self) -> &SyncErrorKind {
        &self.kind
    }

    /// Reports whether the failure is a recoverable permission error.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match &self.kind {
            SyncErrorKind::Compare(error) => error.is_permission_denied(),
            SyncErrorKind::Copy(error) => error.is_permission_denied(),
            SyncErrorKind::Capture(error) => error.is_permission_denied(),
            SyncErrorKind::Io { source, .. } => source.kind() == io::ErrorKind::PermissionDenied,
            SyncErrorKind::Rotation(_)
            | SyncErrorKind::WrongKind { .. }
            | SyncErrorKind::Log { .. } => false,
        }
    }

    /// Reports whether the failure is a kind collision that a parent node may
    /// absorb by skipping the subtree.
    #[must_use]
    pub fn is_kind_mismatch(&self) -> bool {
        match &self.kind {
            SyncErrorKind::WrongKind { .. } => true,
            SyncErrorKind::Compare(error) => error.is_kind_mismatch(),
            _ => false,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SyncErrorKind::Rotation(source) => write!(f, "generation rotation failed: {source}"),
            SyncErrorKind::Compare(source) => write!(f, "{source}"),
            SyncErrorKind::Copy(source) => write!(f, "{source}"),
            SyncErrorKind::Capture(source) => write!(f, "pre-change capture failed: {source}"),
            SyncErrorKind::WrongKind { path, expected } => {
                write!(f, "'{}' exists but is not a {expected}", path.display())
            }
            SyncErrorKind::Io {
                action,
                path,
                source,
            } => write!(f, "failed to {action} '{}': {source}", path.display()),
            SyncErrorKind::Log { source } => {
                write!(f, "failed to write diagnostics: {source}")
            }
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            SyncErrorKind::Rotation(source) | SyncErrorKind::Capture(source) => Some(source),
            SyncErrorKind::Compare(source) => Some(source),
            SyncErrorKind::Copy(source) => Some(source),
            SyncErrorKind::Io { source, .. } | SyncErrorKind::Log { source } => Some(source),
            SyncErrorKind::WrongKind { .. } => None,
        }
    }
}

impl HasExitCode for SyncError {
    fn exit_code(&self) -> ExitCode {
        match &self.kind {
            SyncErrorKind::Rotation(source) => {
                if source.is_kind_mismatch() {
                    ExitCode::PathKind
                } else {
                    ExitCode::FileIo
                }
            }
            SyncErrorKind::Compare(source) => {
                if source.is_kind_mismatch() {
                    ExitCode::PathKind
                } else {
                    ExitCode::FileIo
                }
            }
            SyncErrorKind::WrongKind { .. } => ExitCode::PathKind,
            SyncErrorKind::Copy(_)
            | SyncErrorKind::Capture(_)
            | SyncErrorKind::Io { .. }
            | SyncErrorKind::Log { .. } => ExitCode::FileIo,
        }
    }
}

impl From<CompareError> for SyncError {
    fn from(source: CompareError) -> Self {
        Self::new(SyncErrorKind::Compare(source))
    }
}

impl From<MetaError> for SyncError {
    fn from(source: MetaError) -> Self {
        Self::new(SyncErrorKind::Copy(source))
    }
}

impl From<GenerationError> for SyncError {
    fn from(source: GenerationError) -> Self {
        Self::new(SyncErrorKind::Capture(source))
    }
}

/// Classification of run-aborting failures.
#[derive(Debug)]
pub enum SyncErrorKind {
    /// Generation rotation failed before any mutation.
    Rotation(GenerationError),
    /// A directory comparison failed.
    Compare(CompareError),
    /// A copy primitive failed.
    Copy(MetaError),
    /// A pre-change capture failed.
    Capture(GenerationError),
    /// A path exists with the wrong filesystem kind.
    WrongKind {
        /// The offending path.
        path: PathBuf,
        /// Kind the walker required.
        expected: &'static str,
    },
    /// Filesystem interaction failed.
    Io {
        /// Action being performed.
        action: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The diagnostics writer failed.
    Log {
        /// Underlying error.
        source: io::Error,
    },
}
