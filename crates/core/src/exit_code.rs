//! Centralized exit code definitions for the `oc-mirror` workspace.
//!
//! Each entry of the failure taxonomy carries its own exit code so scripted
//! callers can distinguish a skipped run from a partially applied one. All
//! error types across the workspace resolve to one of these codes.

use std::fmt;

/// Exit codes returned by `oc-mirror` invocations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful completion with every entry reconciled.
    Ok = 0,

    /// Syntax or usage error.
    ///
    /// Returned when command-line arguments are invalid.
    Syntax = 1,

    /// The source root does not exist.
    ///
    /// The run performs no mutation and reports the skip; this is the
    /// configuration-error entry of the taxonomy.
    SourceMissing = 3,

    /// An operand had the wrong filesystem kind at the top level.
    ///
    /// Returned when a path expected to be a directory is a file (or vice
    /// versa) in a position where skipping would corrupt state, such as the
    /// diff root during rotation setup.
    PathKind = 4,

    /// Filesystem I/O failure outside the recoverable permission class.
    FileIo = 11,

    /// The run completed but one or more entries were skipped.
    ///
    /// Emitted when permission failures were recovered inline; the target is
    /// converged everywhere except the skipped entries.
    Partial = 23,
}

impl ExitCode {
    /// Returns the numeric exit code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns the human-readable description used in diagnostics.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Syntax => "syntax or usage error",
            Self::SourceMissing => "source root does not exist",
            Self::PathKind => "operand has the wrong filesystem kind",
            Self::FileIo => "error in file I/O",
            Self::Partial => "partial run due to skipped entries",
        }
    }

    /// Resolves a raw code back to the matching variant, if any.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::Syntax),
            3 => Some(Self::SourceMissing),
            4 => Some(Self::PathKind),
            11 => Some(Self::FileIo),
            23 => Some(Self::Partial),
            _ => None,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

/// Trait for types that carry an associated exit code.
///
/// Error types across the workspace implement this so the CLI can terminate
/// with the taxonomy code of whatever failure reached the top.
pub trait HasExitCode {
    /// Returns the exit code associated with this value.
    fn exit_code(&self) -> ExitCode;
}
