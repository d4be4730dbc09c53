//! Depth-first reconciliation walk.
//!
//! One [`Walker`] lives for the duration of a run. It owns the summary
//! counters and borrows the diagnostics sink; the request configuration is
//! threaded in as plain arguments. Recoverable conditions are absorbed here:
//! a permission failure skips the single entry, a kind collision below the
//! invocation root skips the subtree, and both leave a level-1 diagnostic
//! and a summary count behind. Everything else aborts the run by
//! propagating a [`SyncError`].

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use core::message::Message;
use filters::ExclusionSet;
use logging::{MessageSink, levels};

use crate::error::SyncError;
use crate::summary::SyncSummary;

pub(crate) struct Walker<'a, W> {
    exclusions: &'a ExclusionSet,
    sink: &'a mut MessageSink<W>,
    summary: SyncSummary,
}

impl<'a, W: io::Write> Walker<'a, W> {
    pub(crate) fn new(exclusions: &'a ExclusionSet, sink: &'a mut MessageSink<W>) -> Self {
        Self {
            exclusions,
            sink,
            summary: SyncSummary::default(),
        }
    }

    pub(crate) fn into_summary(self) -> SyncSummary {
        self.summary
    }

    /// Reconciles the invocation roots.
    ///
    /// Kind collisions at this level propagate: skipping the whole
    /// invocation silently would make a misconfigured run look successful.
    pub(crate) fn reconcile_root(
        &mut self,
        source: &Path,
        target: &Path,
        generation: Option<&Path>,
    ) -> Result<(), SyncError> {
        let metadata = fs::symlink_metadata(source)
            .map_err(|error| SyncError::io("inspect metadata for", source, error))?;
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            self.note_symlink(source)
        } else if file_type.is_file() {
            self.reconcile_file(source, target, generation)
        } else if file_type.is_dir() {
            self.reconcile_dir(source, target, generation)
        } else {
            self.note_special(source)
        }
    }

    /// Converges a single regular file onto `target`.
    fn reconcile_file(
        &mut self,
        source: &Path,
        target: &Path,
        generation: Option<&Path>,
    ) -> Result<(), SyncError> {
        self.emit(
            levels::CHECK,
            &Message::info(format!("checking file '{}'", source.display())),
        )?;
        match fs::symlink_metadata(target) {
            Ok(existing) if existing.is_file() => {
                let equal = match compare::files_equal(source, target) {
                    Ok(equal) => equal,
                    Err(error) if error.is_permission_denied() => {
                        return self.note_permission(target);
                    }
                    Err(error) => return Err(error.into()),
                };
                if equal {
                    return Ok(());
                }
                if let Some(generation) = generation
                    && !self.try_capture(target, generation, source)?
                {
                    return Ok(());
                }
                self.emit(
                    levels::MUTATION,
                    &Message::info(format!("updating file '{}'", target.display())),
                )?;
                if self.try_copy_file(source, target)? {
                    self.summary.files_updated += 1;
                }
                Ok(())
            }
            Ok(_) => Err(SyncError::wrong_kind(target, "regular file")),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = target.parent() {
                    let source_parent = source.parent().unwrap_or(Path::new(""));
                    match meta::materialize_with_modes(source_parent, parent) {
                        Ok(()) => {}
                        Err(error) if error.is_permission_denied() => {
                            return self.note_permission(parent);
                        }
                        Err(error) => return Err(error.into()),
                    }
                }
                self.emit(
                    levels::MUTATION,
                    &Message::info(format!("creating file '{}'", target.display())),
                )?;
                if self.try_copy_file(source, target)? {
                    self.summary.files_created += 1;
                }
                Ok(())
            }
            Err(error) => Err(SyncError::io("inspect metadata for", target, error)),
        }
    }

    /// Converges one directory level, then recurses.
    fn reconcile_dir(
        &mut self,
        source: &Path,
        target: &Path,
        generation: Option<&Path>,
    ) -> Result<(), SyncError> {
        self.emit(
            levels::CHECK,
            &Message::info(format!("checking directory '{}'", source.display())),
        )?;
        match fs::symlink_metadata(target) {
            Ok(existing) if existing.is_dir() => {}
            Ok(_) => return Err(SyncError::wrong_kind(target, "directory")),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = target.parent() {
                    let source_parent = source.parent().unwrap_or(Path::new(""));
                    meta::materialize_with_modes(source_parent, parent)?;
                }
                self.emit(
                    levels::MUTATION,
                    &Message::info(format!("creating directory '{}'", target.display())),
                )?;
                match meta::create_dir_with_mode(source, target) {
                    Ok(()) => self.summary.dirs_created += 1,
                    Err(error) if error.is_permission_denied() => {
                        return self.note_permission(target);
                    }
                    Err(error) => return Err(error.into()),
                }
            }
            Err(error) => return Err(SyncError::io("inspect metadata for", target, error)),
        }

        let diff = match compare::compare_dirs(source, target) {
            Ok(diff) => diff,
            Err(error) if error.is_permission_denied() => {
                return self.note_permission(source);
            }
            Err(error) => return Err(error.into()),
        };
        self.emit(
            levels::STATS,
            &Message::info(format!(
                "source only: {}   target only: {}   same: {}   different: {}",
                diff.dirs_only_left.len() + diff.files_only_left.len(),
                diff.dirs_only_right.len() + diff.files_only_right.len(),
                diff.files_equal.len(),
                diff.files_different.len(),
            )),
        )?;

        // Deletions first, mirroring the walk order of the original tool.
        for name in sorted(diff.dirs_only_right) {
            let victim = target.join(&name);
            if let Some(generation) = generation
                && !self.try_capture(&victim, generation, &source.join(&name))?
            {
                continue;
            }
            self.emit(
                levels::MUTATION,
                &Message::info(format!("deleting directory '{}'", victim.display())),
            )?;
            if self.try_remove(&victim, true)? {
                self.summary.dirs_deleted += 1;
            }
        }
        for name in sorted(diff.files_only_right) {
            let victim = target.join(&name);
            if let Some(generation) = generation
                && !self.try_capture(&victim, generation, &source.join(&name))?
            {
                continue;
            }
            self.emit(
                levels::MUTATION,
                &Message::info(format!("deleting file '{}'", victim.display())),
            )?;
            if self.try_remove(&victim, false)? {
                self.summary.files_deleted += 1;
            }
        }

        for name in sorted(diff.files_only_left) {
            let child_source = source.join(&name);
            if self.excluded(&child_source, &name)? {
                continue;
            }
            let child_target = target.join(&name);
            self.emit(
                levels::MUTATION,
                &Message::info(format!("creating file '{}'", child_target.display())),
            )?;
            if self.try_copy_file(&child_source, &child_target)? {
                self.summary.files_created += 1;
            }
        }
        for name in sorted(diff.dirs_only_left) {
            let child_source = source.join(&name);
            if self.excluded(&child_source, &name)? {
                continue;
            }
            self.recurse(&child_source, &target.join(&name), generation)?;
        }

        for name in sorted(diff.files_different) {
            let child_source = source.join(&name);
            let child_target = target.join(&name);
            if let Some(generation) = generation
                && !self.try_capture(&child_target, generation, &child_source)?
            {
                continue;
            }
            self.emit(
                levels::MUTATION,
                &Message::info(format!("updating file '{}'", child_target.display())),
            )?;
            if self.try_copy_file(&child_source, &child_target)? {
                self.summary.files_updated += 1;
            }
        }

        // Exclusions gate first-time creation only; shared directories are
        // always descended into.
        for name in sorted(diff.dirs_in_both) {
            self.recurse(&source.join(&name), &target.join(&name), generation)?;
        }
        Ok(())
    }

    /// Recurses into a child directory pair, absorbing kind collisions.
    fn recurse(
        &mut self,
        source: &Path,
        target: &Path,
        generation: Option<&Path>,
    ) -> Result<(), SyncError> {
        match self.reconcile_dir(source, target, generation) {
            Ok(()) => Ok(()),
            Err(error) if error.is_kind_mismatch() => {
                self.emit(
                    levels::SUMMARY,
                    &Message::warning(format!("{error}, skipping subtree")),
                )?;
                self.summary.nodes_skipped += 1;
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    fn excluded(&mut self, child_source: &Path, name: &OsString) -> Result<bool, SyncError> {
        if !self.exclusions.should_skip(child_source, name) {
            return Ok(false);
        }
        self.emit(
            levels::SKIP,
            &Message::info(format!("excluded '{}'", child_source.display())),
        )?;
        self.summary.entries_excluded += 1;
        Ok(true)
    }

    fn try_copy_file(&mut self, source: &Path, target: &Path) -> Result<bool, SyncError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(source = %source.display(), target = %target.display(), "copy file");
        match meta::copy_file_with_metadata(source, target) {
            Ok(()) => Ok(true),
            Err(error) if error.is_permission_denied() => {
                self.note_permission(target)?;
                Ok(false)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn try_capture(
        &mut self,
        target: &Path,
        generation: &Path,
        source: &Path,
    ) -> Result<bool, SyncError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(target = %target.display(), "capture pre-change state");
        match generations::capture(target, generation, source) {
            Ok(()) => Ok(true),
            Err(error) if error.is_permission_denied() => {
                // Without a capture the mutation would lose history; skip
                // the entry instead.
                self.note_permission(target)?;
                Ok(false)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn try_remove(&mut self, victim: &Path, is_dir: bool) -> Result<bool, SyncError> {
        let result = if is_dir {
            fs::remove_dir_all(victim)
        } else {
            fs::remove_file(victim)
        };
        match result {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::PermissionDenied => {
                self.note_permission(victim)?;
                Ok(false)
            }
            Err(error) => Err(SyncError::io(
                if is_dir {
                    "remove directory"
                } else {
                    "remove file"
                },
                victim,
                error,
            )),
        }
    }

    fn note_permission(&mut self, path: &Path) -> Result<(), SyncError> {
        self.emit(
            levels::SUMMARY,
            &Message::warning(format!(
                "permission denied, skipping '{}'",
                path.display()
            )),
        )?;
        self.summary.permission_failures += 1;
        Ok(())
    }

    fn note_symlink(&mut self, source: &Path) -> Result<(), SyncError> {
        self.emit(
            levels::SUMMARY,
            &Message::warning(format!("did not follow symlink '{}'", source.display())),
        )?;
        self.summary.symlinks_skipped += 1;
        Ok(())
    }

    fn note_special(&mut self, source: &Path) -> Result<(), SyncError> {
        self.emit(
            levels::SUMMARY,
            &Message::warning(format!(
                "skipping special file '{}'",
                source.display()
            )),
        )?;
        self.summary.specials_skipped += 1;
        Ok(())
    }

    fn emit(&mut self, level: u8, message: &Message) -> Result<(), SyncError> {
        self.sink.emit(level, message).map_err(SyncError::log)
    }
}

fn sorted(mut names: Vec<OsString>) -> Vec<OsString> {
    names.sort();
    names
}
