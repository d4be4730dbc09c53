//! Level scheme shared by every diagnostic call site.
//!
//! Levels grow with diagnostic volume: a message tagged `SUMMARY` appears at
//! `-v 1` and above, a `STATS` message only at `-v 5`. Warnings about skipped
//! entries (permission failures, symlinks) use `SUMMARY` so they are visible
//! at any non-silent volume.

/// Run banner, completion line, warnings.
pub const SUMMARY: u8 = 1;

/// Individual mutations: create, update, delete.
pub const MUTATION: u8 = 2;

/// Entries skipped by the exclusion set.
pub const SKIP: u8 = 3;

/// Per-entry equality checks.
pub const CHECK: u8 = 4;

/// Per-directory classification statistics.
pub const STATS: u8 = 5;
