//! Per-run accounting.

use core::exit_code::{ExitCode, HasExitCode};

/// How the run ended.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SyncStatus {
    /// The walk ran to completion.
    #[default]
    Completed,
    /// The source root was missing; nothing was mutated.
    SourceMissing,
}

/// Counters accumulated over one mirror run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncSummary {
    /// How the run ended.
    pub status: SyncStatus,
    /// Files copied into the target for the first time.
    pub files_created: u64,
    /// Files overwritten because their metadata diverged.
    pub files_updated: u64,
    /// Target-only files removed.
    pub files_deleted: u64,
    /// Directories created in the target.
    pub dirs_created: u64,
    /// Target-only directory subtrees removed.
    pub dirs_deleted: u64,
    /// Source-only entries withheld by the exclusion set.
    pub entries_excluded: u64,
    /// Source entries skipped because they are symbolic links.
    pub symlinks_skipped: u64,
    /// Source entries skipped because they are neither files nor directories.
    pub specials_skipped: u64,
    /// Entries skipped after a recovered permission failure.
    pub permission_failures: u64,
    /// Subtrees skipped after a kind collision below the invocation root.
    pub nodes_skipped: u64,
}

impl SyncSummary {
    /// Total number of mutations applied to the target.
    #[must_use]
    pub const fn mutations(&self) -> u64 {
        self.files_created
            + self.files_updated
            + self.files_deleted
            + self.dirs_created
            + self.dirs_deleted
    }

    /// Reports whether anything was skipped rather than reconciled.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.permission_failures > 0 || self.nodes_skipped > 0
    }
}

impl HasExitCode for SyncSummary {
    fn exit_code(&self) -> ExitCode {
        match self.status {
            SyncStatus::SourceMissing => ExitCode::SourceMissing,
            SyncStatus::Completed => {
                if self.is_partial() {
                    ExitCode::Partial
                } else {
                    ExitCode::Ok
                }
            }
        }
    }
}
