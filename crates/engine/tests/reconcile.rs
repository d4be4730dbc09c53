//! Integration tests for the reconciliation walk without diff capture.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use core::exit_code::{ExitCode, HasExitCode};
use engine::{SyncRequest, SyncStatus, SyncSummary, run_sync};
use filetime::FileTime;
use filters::ExclusionSet;
use logging::{MessageSink, Verbosity};

fn run(request: &SyncRequest) -> (SyncSummary, String) {
    let mut sink = MessageSink::new(Vec::new(), Verbosity::MAX);
    let summary = run_sync(request, &mut sink).expect("run succeeds");
    let output = String::from_utf8(sink.into_inner()).expect("utf-8");
    (summary, output)
}

fn write_with_mtime(path: &Path, contents: &[u8], seconds: i64) {
    fs::write(path, contents).expect("write");
    filetime::set_file_mtime(path, FileTime::from_unix_time(seconds, 0)).expect("set mtime");
}

fn tree() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir(&source).expect("mkdir");
    (temp, source, target)
}

#[test]
fn fresh_target_receives_file_with_metadata() {
    let (_temp, source, target) = tree();
    write_with_mtime(&source.join("f.txt"), &[b'x'; 100], 1_600_000_000);

    let (summary, _) = run(&SyncRequest::new(&source, &target));

    assert_eq!(summary.files_created, 1);
    assert_eq!(summary.dirs_created, 1);
    let copied = target.join("f.txt");
    let source_meta = fs::metadata(source.join("f.txt")).expect("metadata");
    let target_meta = fs::metadata(&copied).expect("metadata");
    assert_eq!(source_meta.len(), target_meta.len());
    assert_eq!(
        FileTime::from_last_modification_time(&source_meta),
        FileTime::from_last_modification_time(&target_meta)
    );
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        assert_eq!(
            source_meta.permissions().mode(),
            target_meta.permissions().mode()
        );
    }
}

#[test]
fn second_run_performs_no_mutation() {
    let (_temp, source, target) = tree();
    fs::create_dir(source.join("sub")).expect("mkdir");
    write_with_mtime(&source.join("a.txt"), b"alpha", 1_600_000_000);
    write_with_mtime(&source.join("sub/b.txt"), b"beta", 1_600_000_100);

    let request = SyncRequest::new(&source, &target);
    let (first, _) = run(&request);
    assert!(first.mutations() > 0);

    let (second, _) = run(&request);
    assert_eq!(second.mutations(), 0, "converged tree must stay untouched");
    assert_eq!(second.exit_code(), ExitCode::Ok);
}

#[test]
fn target_only_entries_are_deleted() {
    let (_temp, source, target) = tree();
    fs::create_dir_all(target.join("stale_dir/deep")).expect("mkdir");
    fs::write(target.join("stale_dir/deep/f.txt"), b"x").expect("write");
    fs::write(target.join("stale.txt"), b"y").expect("write");
    write_with_mtime(&source.join("kept.txt"), b"kept", 1_600_000_000);

    let (summary, _) = run(&SyncRequest::new(&source, &target));

    assert_eq!(summary.dirs_deleted, 1);
    assert_eq!(summary.files_deleted, 1);
    assert!(!target.join("stale_dir").exists());
    assert!(!target.join("stale.txt").exists());
    assert!(target.join("kept.txt").exists());
}

#[test]
fn diverged_file_is_overwritten() {
    let (_temp, source, target) = tree();
    fs::create_dir(&target).expect("mkdir");
    write_with_mtime(&source.join("f.txt"), b"new contents", 1_600_000_200);
    write_with_mtime(&target.join("f.txt"), b"old", 1_500_000_000);

    let (summary, _) = run(&SyncRequest::new(&source, &target));

    assert_eq!(summary.files_updated, 1);
    assert_eq!(fs::read(target.join("f.txt")).expect("read"), b"new contents");
}

#[test]
fn matching_size_and_truncated_mtime_suppresses_update() {
    let (_temp, source, target) = tree();
    fs::create_dir(&target).expect("mkdir");
    // Same length, same microsecond-truncated mtime, different bytes: the
    // metadata quick-check reports equality and the engine must not touch
    // the target.
    write_with_mtime(&source.join("x.txt"), b"aaaa", 1_600_000_000);
    write_with_mtime(&target.join("x.txt"), b"bbbb", 1_600_000_000);

    let (summary, _) = run(&SyncRequest::new(&source, &target));

    assert_eq!(summary.mutations(), 0);
    assert_eq!(fs::read(target.join("x.txt")).expect("read"), b"bbbb");
}

#[test]
fn excluded_entries_are_never_created() {
    let (_temp, source, target) = tree();
    fs::create_dir(source.join(".git")).expect("mkdir");
    fs::write(source.join(".git/config"), b"cfg").expect("write");
    fs::create_dir(source.join("skipme")).expect("mkdir");
    write_with_mtime(&source.join("kept.txt"), b"kept", 1_600_000_000);
    write_with_mtime(&source.join("unwanted.txt"), b"no", 1_600_000_000);

    let exclusions = ExclusionSet::new(
        [source.join("skipme"), source.join("unwanted.txt")],
        [OsString::from(".git")],
    )
    .expect("exclusions");
    let request = SyncRequest::new(&source, &target).with_exclusions(exclusions);
    let (summary, output) = run(&request);

    assert_eq!(summary.entries_excluded, 3);
    assert!(!target.join(".git").exists());
    assert!(!target.join("skipme").exists());
    assert!(!target.join("unwanted.txt").exists());
    assert!(target.join("kept.txt").exists());
    assert!(output.contains("excluded"));
}

#[test]
fn exclusions_do_not_gate_already_mirrored_subtrees() {
    let (_temp, source, target) = tree();
    fs::create_dir(source.join("data")).expect("mkdir");
    write_with_mtime(&source.join("data/f.txt"), b"fresh", 1_600_000_300);
    // The subtree already exists in the target: the exclusion must not stop
    // ongoing sync or deletion inside it.
    fs::create_dir_all(target.join("data")).expect("mkdir");
    write_with_mtime(&target.join("data/f.txt"), b"stale!!", 1_500_000_000);
    fs::write(target.join("data/extra.txt"), b"extra").expect("write");

    let exclusions =
        ExclusionSet::new([source.join("data")], []).expect("exclusions");
    let request = SyncRequest::new(&source, &target).with_exclusions(exclusions);
    let (summary, _) = run(&request);

    assert_eq!(summary.files_updated, 1);
    assert_eq!(summary.files_deleted, 1);
    assert_eq!(fs::read(target.join("data/f.txt")).expect("read"), b"fresh");
    assert!(!target.join("data/extra.txt").exists());
}

#[cfg(unix)]
#[test]
fn symlinked_source_entries_are_skipped() {
    use std::os::unix::fs::symlink;

    let (_temp, source, target) = tree();
    write_with_mtime(&source.join("real.txt"), b"real", 1_600_000_000);
    symlink(source.join("real.txt"), source.join("link.txt")).expect("symlink");

    let (summary, _) = run(&SyncRequest::new(&source, &target));

    assert!(target.join("real.txt").exists());
    assert!(!target.join("link.txt").exists());
    // Symlinked children vanish during classification, so no diagnostic is
    // counted for them; only the files that exist as regular entries count.
    assert_eq!(summary.files_created, 1);
}

#[cfg(unix)]
#[test]
fn symlinked_source_root_is_reported_and_skipped() {
    use std::os::unix::fs::symlink;

    let (temp, source, target) = tree();
    let link = temp.path().join("rootlink");
    symlink(&source, &link).expect("symlink");

    let (summary, output) = run(&SyncRequest::new(&link, &target));

    assert_eq!(summary.symlinks_skipped, 1);
    assert_eq!(summary.mutations(), 0);
    assert!(!target.exists());
    assert!(output.contains("did not follow symlink"));
}

#[test]
fn kind_collision_below_root_skips_the_subtree() {
    let (_temp, source, target) = tree();
    fs::create_dir(source.join("clash")).expect("mkdir");
    write_with_mtime(&source.join("clash/f.txt"), b"inside", 1_600_000_000);
    write_with_mtime(&source.join("ok.txt"), b"ok", 1_600_000_000);
    fs::create_dir(&target).expect("mkdir");
    fs::write(target.join("clash"), b"a file, not a dir").expect("write");

    let (summary, output) = run(&SyncRequest::new(&source, &target));

    // The collision is absorbed, the sibling still syncs, and the run is
    // reported partial.
    assert_eq!(summary.nodes_skipped, 1);
    assert!(target.join("ok.txt").exists());
    assert!(target.join("clash").is_file(), "collision target left alone");
    assert_eq!(summary.exit_code(), ExitCode::Partial);
    assert!(output.contains("skipping subtree"));
}

#[test]
fn missing_source_is_a_reported_no_op() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("absent");
    let target = temp.path().join("target");

    let (summary, output) = run(&SyncRequest::new(&source, &target));

    assert_eq!(summary.status, SyncStatus::SourceMissing);
    assert_eq!(summary.exit_code(), ExitCode::SourceMissing);
    assert_eq!(summary.mutations(), 0);
    assert!(!target.exists());
    assert!(output.contains("does not exist"));
}

#[test]
fn file_source_root_mirrors_a_single_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("one.txt");
    write_with_mtime(&source, b"single", 1_600_000_000);
    let target = temp.path().join("nested/deep/one.txt");

    let (summary, _) = run(&SyncRequest::new(&source, &target));

    assert_eq!(summary.files_created, 1);
    assert_eq!(fs::read(&target).expect("read"), b"single");
}

#[test]
fn deterministic_mutation_order() {
    let (_temp, source, target) = tree();
    for name in ["b.txt", "a.txt", "c.txt"] {
        write_with_mtime(&source.join(name), b"x", 1_600_000_000);
    }

    let (_, output) = run(&SyncRequest::new(&source, &target));

    let creations: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("creating file"))
        .collect();
    assert_eq!(creations.len(), 3);
    assert!(creations[0].contains("a.txt"));
    assert!(creations[1].contains("b.txt"));
    assert!(creations[2].contains("c.txt"));
}
