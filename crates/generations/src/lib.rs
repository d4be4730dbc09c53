#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `generations` gives the mirror its bounded-history backup semantics. The
//! diff root holds integer-named generation directories, `1` being the
//! newest: [`rotate`] ages them once at the start of a diff-enabled run, and
//! [`capture`] copies the pre-change state of a target object into the
//! active generation before the engine overwrites or deletes it.
//!
//! # Design
//!
//! - The on-disk layout of the diff root IS the tool's durable state. Nothing
//!   here keeps indexes or manifests; an invocation finds the generations by
//!   name and leaves a layout the next invocation can find the same way.
//! - Captures are mirrored at the *source's* absolute path under the
//!   generation directory, so a restore knows exactly where an object
//!   belonged without consulting anything else.
//! - Rotation runs before any mutation of the target. A rotation failure
//!   therefore aborts the whole invocation; reconciling against a partially
//!   rotated sequence would attribute captures to the wrong generation.
//!
//! # Invariants
//!
//! - After rotation only generations `1..=max` exist; content older than the
//!   retention horizon was merged into generation `max` once and is gone
//!   afterwards. No generation number above `max` ever exists on disk.
//! - A capture destination that already exists is replaced wholesale, so a
//!   capture always reflects the state immediately before the current
//!   mutation, not a mix of runs.
//!
//! # Errors
//!
//! [`GenerationError`] distinguishes a diff root of the wrong filesystem
//! kind (an invocation-aborting configuration problem) from ordinary I/O
//! failures, and forwards copy failures from `meta` unchanged.
//!
//! # See also
//!
//! - `engine` for the mutation sites that call [`capture`] first.

use std::num::NonZeroU32;

mod capture;
mod error;
mod rotate;

pub use capture::capture;
pub use error::GenerationError;
pub use rotate::rotate;

/// Default number of retained generations.
pub const DEFAULT_GENERATIONS: NonZeroU32 = NonZeroU32::new(9).unwrap();
