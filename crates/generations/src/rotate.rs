//! Generation ageing.

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::GenerationError;

/// Ages the numbered generations under `diff_root` by one step.
///
/// The oldest retained generation absorbs the one about to fall off the
/// horizon, every younger generation shifts up by one, and a fresh
/// generation `1` is left ready for this run's captures. Returns the path of
/// generation `1`.
///
/// Steps, in order:
/// 1. ensure `diff_root/max` exists,
/// 2. merge the contents of `diff_root/(max-1)` into it (directories are
///    merged, same-named files are overwritten by the younger copy),
/// 3. delete `diff_root/(max-1)`,
/// 4. rename `diff_root/i` to `diff_root/(i+1)` for `i` from `max-2` down to
///    `1`, skipping numbers that do not exist,
/// 5. ensure `diff_root/1` exists.
pub fn rotate(diff_root: &Path, max_generations: NonZeroU32) -> Result<PathBuf, GenerationError> {
    if diff_root.exists() && !diff_root.is_dir() {
        return Err(GenerationError::DiffRootNotADirectory {
            path: diff_root.to_path_buf(),
        });
    }
    let max = max_generations.get();

    let oldest = generation_path(diff_root, max);
    fs::create_dir_all(&oldest)
        .map_err(|error| GenerationError::io("create directory", &oldest, error))?;

    let expiring = generation_path(diff_root, max - 1);
    if max > 1 && expiring.is_dir() {
        merge_tree(&expiring, &oldest)?;
        fs::remove_dir_all(&expiring)
            .map_err(|error| GenerationError::io("remove directory", &expiring, error))?;
    }

    for number in (1..max.saturating_sub(1)).rev() {
        let from = generation_path(diff_root, number);
        if !from.exists() {
            continue;
        }
        let to = generation_path(diff_root, number + 1);
        fs::rename(&from, &to)
            .map_err(|error| GenerationError::io("rename generation to", &to, error))?;
    }

    let newest = generation_path(diff_root, 1);
    fs::create_dir_all(&newest)
        .map_err(|error| GenerationError::io("create directory", &newest, error))?;
    Ok(newest)
}

fn generation_path(diff_root: &Path, number: u32) -> PathBuf {
    diff_root.join(number.to_string())
}

/// Recursively folds `from` into `to`, keeping whatever `to` already holds.
fn merge_tree(from: &Path, to: &Path) -> Result<(), GenerationError> {
    for entry in
        fs::read_dir(from).map_err(|error| GenerationError::io("read directory", from, error))?
    {
        let entry =
            entry.map_err(|error| GenerationError::io("read entry in", from, error))?;
        let file_type = entry
            .file_type()
            .map_err(|error| GenerationError::io("inspect metadata for", &entry.path(), error))?;
        let destination = to.join(entry.file_name());
        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            if !destination.is_dir() {
                meta::create_dir_with_mode(&entry.path(), &destination)?;
            }
            merge_tree(&entry.path(), &destination)?;
        } else if file_type.is_file() {
            meta::copy_file_with_metadata(&entry.path(), &destination)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn generations(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).expect("non-zero")
    }

    #[test]
    fn empty_diff_root_gains_boundary_generations() {
        let temp = tempfile::tempdir().expect("tempdir");
        let diff_root = temp.path().join("diff");

        let newest = rotate(&diff_root, generations(9)).expect("rotate");

        assert_eq!(newest, diff_root.join("1"));
        assert!(diff_root.join("1").is_dir());
        assert!(diff_root.join("9").is_dir());
        assert!(!diff_root.join("2").exists());
    }

    #[test]
    fn full_cycle_shifts_and_merges() {
        let temp = tempfile::tempdir().expect("tempdir");
        let diff_root = temp.path().join("diff");
        for number in 1..=3 {
            let generation = diff_root.join(number.to_string());
            fs::create_dir_all(&generation).expect("mkdir");
            fs::write(generation.join(format!("from{number}.txt")), b"x").expect("write");
        }
        fs::write(diff_root.join("3/shared.txt"), b"old").expect("write");
        fs::write(diff_root.join("2/shared.txt"), b"newer").expect("write");

        rotate(&diff_root, generations(3)).expect("rotate");

        // Generation 2's content was merged into 3; the younger copy of a
        // clashing file wins.
        assert!(diff_root.join("3/from3.txt").exists());
        assert!(diff_root.join("3/from2.txt").exists());
        assert_eq!(
            fs::read(diff_root.join("3/shared.txt")).expect("read"),
            b"newer"
        );
        // Generation 1 became 2.
        assert!(diff_root.join("2/from1.txt").exists());
        // Fresh, empty generation 1.
        assert!(diff_root.join("1").is_dir());
        assert_eq!(fs::read_dir(diff_root.join("1")).expect("read").count(), 0);
        // Nothing above the horizon.
        assert!(!diff_root.join("4").exists());
    }

    #[test]
    fn merge_preserves_nested_structure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let diff_root = temp.path().join("diff");
        fs::create_dir_all(diff_root.join("2/nested/deeper")).expect("mkdir");
        fs::write(diff_root.join("2/nested/deeper/f.txt"), b"deep").expect("write");
        fs::create_dir_all(diff_root.join("3/nested")).expect("mkdir");
        fs::write(diff_root.join("3/nested/existing.txt"), b"keep").expect("write");

        rotate(&diff_root, generations(3)).expect("rotate");

        assert_eq!(
            fs::read(diff_root.join("3/nested/deeper/f.txt")).expect("read"),
            b"deep"
        );
        assert_eq!(
            fs::read(diff_root.join("3/nested/existing.txt")).expect("read"),
            b"keep"
        );
    }

    #[test]
    fn missing_generations_are_skipped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let diff_root = temp.path().join("diff");
        fs::create_dir_all(diff_root.join("2")).expect("mkdir");
        fs::write(diff_root.join("2/two.txt"), b"2").expect("write");

        rotate(&diff_root, generations(5)).expect("rotate");

        assert!(diff_root.join("3/two.txt").exists());
        assert!(!diff_root.join("2").exists());
        assert!(diff_root.join("1").is_dir());
        assert!(diff_root.join("5").is_dir());
    }

    #[test]
    fn single_generation_horizon_retains_its_content() {
        let temp = tempfile::tempdir().expect("tempdir");
        let diff_root = temp.path().join("diff");
        fs::create_dir_all(diff_root.join("1")).expect("mkdir");
        fs::write(diff_root.join("1/kept.txt"), b"x").expect("write");

        let newest = rotate(&diff_root, generations(1)).expect("rotate");

        // With a horizon of one there is nothing to shift into; generation 1
        // keeps accumulating.
        assert_eq!(newest, diff_root.join("1"));
        assert!(diff_root.join("1/kept.txt").exists());
    }

    #[test]
    fn file_shaped_diff_root_aborts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let diff_root = temp.path().join("diff");
        fs::write(&diff_root, b"not a dir").expect("write");

        let error = rotate(&diff_root, generations(9)).expect_err("must fail");
        assert!(error.is_kind_mismatch());
    }
}
