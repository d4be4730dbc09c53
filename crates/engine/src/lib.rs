#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` drives a mirror run: it makes the target tree structurally and
//! content-equal to the source tree with a single-threaded, fully
//! synchronous, depth-first walk. Per directory pair it asks `compare` for a
//! classification, consults `filters` before first-time creations, calls
//! `generations` to capture pre-change state, and applies mutations through
//! the `meta` copy primitives. The engine itself owns only orchestration.
//!
//! # Design
//!
//! - A run moves through `INIT → (ROTATE)? → RECONCILE → DONE`. Rotation
//!   happens exactly once, before any target mutation, and only when diff
//!   capture is enabled; a rotation failure aborts the run so the generation
//!   numbering stays coherent.
//! - [`SyncRequest`] carries the whole invocation configuration and is
//!   read-only during the walk. Diagnostics flow through the caller's
//!   [`MessageSink`](logging::MessageSink); there is no global state.
//! - Mutations apply immediately and are not transactional across the run.
//!   An interruption leaves the target partially converged, never corrupted:
//!   each individual file or directory operation completes on its own.
//! - Within a directory, the walker deletes target-only entries, creates
//!   source-only entries, updates diverged files, and finally recurses into
//!   shared subdirectories, processing names in sorted order so runs are
//!   reproducible.
//!
//! # Errors
//!
//! Permission failures on individual entries and kind collisions below the
//! invocation root are recovered inline: the entry or subtree is skipped
//! with a diagnostic and counted in the [`SyncSummary`]. Every other
//! failure surfaces as a [`SyncError`] and aborts the run. A missing source
//! root is neither: the run is reported as a no-op via
//! [`SyncStatus::SourceMissing`].
//!
//! # See also
//!
//! - `compare` for the read-only classification this engine applies.
//! - `generations` for rotation and pre-change capture.
//! - `cli` for the front-end that builds a [`SyncRequest`] from arguments.

use std::io::Write;

use core::message::Message;
use logging::{MessageSink, levels};

mod error;
mod request;
mod summary;
mod walker;

pub use error::{SyncError, SyncErrorKind};
pub use request::{DiffOptions, SyncRequest};
pub use summary::{SyncStatus, SyncSummary};

use walker::Walker;

/// Runs one mirror invocation to completion.
///
/// Returns the run's [`SyncSummary`] on success; consult
/// [`HasExitCode`](core::exit_code::HasExitCode) on either the summary or
/// the error for the process exit code.
pub fn run_sync<W: Write>(
    request: &SyncRequest,
    sink: &mut MessageSink<W>,
) -> Result<SyncSummary, SyncError> {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        source = %request.source().display(),
        target = %request.target().display(),
        "starting mirror run"
    );

    if !request.source().exists() {
        sink.emit(
            levels::SUMMARY,
            &Message::warning(format!(
                "source '{}' does not exist, nothing to do",
                request.source().display()
            )),
        )
        .map_err(SyncError::log)?;
        return Ok(SyncSummary {
            status: SyncStatus::SourceMissing,
            ..SyncSummary::default()
        });
    }

    sink.emit(
        levels::SUMMARY,
        &Message::info(format!(
            "mirroring '{}' into '{}'",
            request.source().display(),
            request.target().display()
        )),
    )
    .map_err(SyncError::log)?;

    let generation = match request.diff() {
        Some(diff) => {
            sink.emit(
                levels::SUMMARY,
                &Message::info(format!(
                    "capturing overwritten state under '{}' ({} generations)",
                    diff.root().display(),
                    diff.max_generations()
                )),
            )
            .map_err(SyncError::log)?;
            Some(generations::rotate(diff.root(), diff.max_generations()).map_err(SyncError::rotation)?)
        }
        None => None,
    };

    let summary = {
        let mut walker = Walker::new(request.exclusions(), sink);
        walker.reconcile_root(request.source(), request.target(), generation.as_deref())?;
        walker.into_summary()
    };

    sink.emit(
        levels::SUMMARY,
        &Message::info(format!(
            "done: {} mutations applied, {} entries excluded, {} entries skipped",
            summary.mutations(),
            summary.entries_excluded,
            summary.permission_failures
                + summary.nodes_skipped
                + summary.symlinks_skipped
                + summary.specials_skipped,
        )),
    )
    .map_err(SyncError::log)?;

    Ok(summary)
}
