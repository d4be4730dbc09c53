//! Pre-change capture into the active generation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use oc_core::paths::{absolutize_lexical, relative_form};

use crate::GenerationError;

/// Copies the current state of `target` into `generation_root`, mirrored at
/// the absolute path of `source`.
///
/// Called immediately before the engine updates or deletes `target`. A file
/// is captured as a file; a directory is captured as a whole subtree with
/// permission bits and modification times reproduced. Symbolic links inside
/// a captured subtree are skipped, never followed. An existing capture at
/// the destination is removed first so the result reflects the state
/// immediately before this mutation.
pub fn capture(
    target: &Path,
    generation_root: &Path,
    source: &Path,
) -> Result<(), GenerationError> {
    let destination = capture_destination(generation_root, source)?;

    if let Some(parent) = destination.parent() {
        let absolute = absolute_source(source)?;
        let source_parent = absolute.parent().unwrap_or(Path::new("/"));
        meta::materialize_with_modes(source_parent, parent)?;
    }

    match fs::symlink_metadata(&destination) {
        Ok(existing) => {
            if existing.is_dir() {
                fs::remove_dir_all(&destination).map_err(|error| {
                    GenerationError::io("remove directory", &destination, error)
                })?;
            } else {
                fs::remove_file(&destination)
                    .map_err(|error| GenerationError::io("remove file", &destination, error))?;
            }
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(GenerationError::io(
                "inspect metadata for",
                &destination,
                error,
            ));
        }
    }

    let metadata = fs::symlink_metadata(target)
        .map_err(|error| GenerationError::io("inspect metadata for", target, error))?;
    if metadata.is_dir() {
        copy_tree(target, &destination)
    } else {
        meta::copy_file_with_metadata(target, &destination)?;
        Ok(())
    }
}

/// Resolves where a capture for `source` lives under `generation_root`.
fn capture_destination(
    generation_root: &Path,
    source: &Path,
) -> Result<PathBuf, GenerationError> {
    let absolute = absolute_source(source)?;
    Ok(generation_root.join(relative_form(&absolute)))
}

fn absolute_source(source: &Path) -> Result<PathBuf, GenerationError> {
    let cwd = std::env::current_dir()
        .map_err(|error| GenerationError::io("resolve working directory for", source, error))?;
    Ok(absolutize_lexical(&cwd, source))
}

/// Recursively copies `from` into the not-yet-existing `to`.
fn copy_tree(from: &Path, to: &Path) -> Result<(), GenerationError> {
    meta::create_dir_with_mode(from, to)?;
    for entry in
        fs::read_dir(from).map_err(|error| GenerationError::io("read directory", from, error))?
    {
        let entry = entry.map_err(|error| GenerationError::io("read entry in", from, error))?;
        let file_type = entry
            .file_type()
            .map_err(|error| GenerationError::io("inspect metadata for", &entry.path(), error))?;
        if file_type.is_symlink() {
            continue;
        }
        let destination = to.join(entry.file_name());
        if file_type.is_dir() {
            copy_tree(&entry.path(), &destination)?;
        } else if file_type.is_file() {
            meta::copy_file_with_metadata(&entry.path(), &destination)?;
        }
    }
    // Stamp the directory itself last so child writes cannot disturb it.
    meta::copy_metadata(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs;

    #[test]
    fn file_capture_mirrors_the_source_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("tree/doc.txt");
        let target = temp.path().join("mirror/doc.txt");
        fs::create_dir_all(source.parent().unwrap()).expect("mkdir");
        fs::create_dir_all(target.parent().unwrap()).expect("mkdir");
        fs::write(&source, b"new").expect("write");
        fs::write(&target, b"old state").expect("write");
        let generation = temp.path().join("diff/1");
        fs::create_dir_all(&generation).expect("mkdir");

        capture(&target, &generation, &source).expect("capture");

        let expected = generation.join(relative_form(&source));
        assert_eq!(fs::read(&expected).expect("read"), b"old state");
    }

    #[test]
    fn capture_preserves_mtime() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("a/f.txt");
        let target = temp.path().join("b/f.txt");
        fs::create_dir_all(source.parent().unwrap()).expect("mkdir");
        fs::create_dir_all(target.parent().unwrap()).expect("mkdir");
        fs::write(&source, b"src").expect("write");
        fs::write(&target, b"tgt").expect("write");
        let mtime = FileTime::from_unix_time(1_500_000_000, 0);
        filetime::set_file_mtime(&target, mtime).expect("set mtime");
        let generation = temp.path().join("gen");
        fs::create_dir_all(&generation).expect("mkdir");

        capture(&target, &generation, &source).expect("capture");

        let captured = generation.join(relative_form(&source));
        let captured_meta = fs::metadata(&captured).expect("metadata");
        assert_eq!(FileTime::from_last_modification_time(&captured_meta), mtime);
    }

    #[test]
    fn directory_capture_copies_the_whole_subtree() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("tree/sub");
        let target = temp.path().join("mirror/sub");
        fs::create_dir_all(&source).expect("mkdir");
        fs::create_dir_all(target.join("deep")).expect("mkdir");
        fs::write(target.join("one.txt"), b"1").expect("write");
        fs::write(target.join("deep/two.txt"), b"2").expect("write");
        let generation = temp.path().join("diff/1");
        fs::create_dir_all(&generation).expect("mkdir");

        capture(&target, &generation, &source).expect("capture");

        let base = generation.join(relative_form(&source));
        assert_eq!(fs::read(base.join("one.txt")).expect("read"), b"1");
        assert_eq!(fs::read(base.join("deep/two.txt")).expect("read"), b"2");
    }

    #[test]
    fn repeated_capture_replaces_wholesale() {
        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("tree/sub");
        let target = temp.path().join("mirror/sub");
        fs::create_dir_all(&source).expect("mkdir");
        fs::create_dir_all(&target).expect("mkdir");
        fs::write(target.join("stale.txt"), b"stale").expect("write");
        let generation = temp.path().join("gen");
        fs::create_dir_all(&generation).expect("mkdir");

        capture(&target, &generation, &source).expect("first capture");

        fs::remove_file(target.join("stale.txt")).expect("remove");
        fs::write(target.join("fresh.txt"), b"fresh").expect("write");
        capture(&target, &generation, &source).expect("second capture");

        let base = generation.join(relative_form(&source));
        assert!(!base.join("stale.txt").exists(), "stale capture must be gone");
        assert_eq!(fs::read(base.join("fresh.txt")).expect("read"), b"fresh");
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_inside_subtrees_are_not_captured() {
        use std::os::unix::fs::symlink;

        let temp = tempfile::tempdir().expect("tempdir");
        let source = temp.path().join("tree/sub");
        let target = temp.path().join("mirror/sub");
        fs::create_dir_all(&source).expect("mkdir");
        fs::create_dir_all(&target).expect("mkdir");
        fs::write(target.join("real.txt"), b"real").expect("write");
        symlink(target.join("real.txt"), target.join("link.txt")).expect("symlink");

        let generation = temp.path().join("gen");
        fs::create_dir_all(&generation).expect("mkdir");
        capture(&target, &generation, &source).expect("capture");

        let base = generation.join(relative_form(&source));
        assert!(base.join("real.txt").exists());
        assert!(!base.join("link.txt").exists());
    }
}
