//! Integration tests driving the `oc-mirror` binary end to end.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn oc_mirror() -> Command {
    Command::cargo_bin("oc-mirror").expect("binary builds")
}

// ============================================================================
// Basic Mirroring
// ============================================================================

#[test]
fn mirrors_a_fresh_tree() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(source.join("sub")).expect("mkdir");
    fs::write(source.join("top.txt"), b"top").expect("write");
    fs::write(source.join("sub/inner.txt"), b"inner").expect("write");

    oc_mirror()
        .args(["--source"])
        .arg(&source)
        .args(["--target"])
        .arg(&target)
        .assert()
        .success();

    assert_eq!(fs::read(target.join("top.txt")).expect("read"), b"top");
    assert_eq!(fs::read(target.join("sub/inner.txt")).expect("read"), b"inner");
}

#[test]
fn removes_entries_absent_from_the_source() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir(&source).expect("mkdir");
    fs::create_dir_all(target.join("stale")).expect("mkdir");
    fs::write(target.join("stale/f.txt"), b"x").expect("write");
    fs::write(source.join("keep.txt"), b"keep").expect("write");
    fs::write(target.join("keep.txt"), b"keep").expect("write");

    oc_mirror()
        .args(["--source"])
        .arg(&source)
        .args(["--target"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("deleting directory"));

    assert!(!target.join("stale").exists());
    assert!(target.join("keep.txt").exists());
}

#[test]
fn second_run_reports_zero_mutations() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir(&source).expect("mkdir");
    fs::write(source.join("f.txt"), b"payload").expect("write");

    oc_mirror()
        .args(["--source"])
        .arg(&source)
        .args(["--target"])
        .arg(&target)
        .assert()
        .success();

    oc_mirror()
        .args(["--source"])
        .arg(&source)
        .args(["--target"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("done: 0 mutations applied"));
}

// ============================================================================
// Exclusions
// ============================================================================

#[test]
fn excluded_basenames_stay_out_of_the_target() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    fs::create_dir_all(source.join(".git")).expect("mkdir");
    fs::write(source.join(".git/HEAD"), b"ref").expect("write");
    fs::write(source.join("code.rs"), b"fn main() {}").expect("write");

    oc_mirror()
        .args(["--source"])
        .arg(&source)
        .args(["--target"])
        .arg(&target)
        .args(["--exclude-name", ".git", "--verbosity", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("excluded"));

    assert!(!target.join(".git").exists());
    assert!(target.join("code.rs").exists());
}

// ============================================================================
// Verbosity
// ============================================================================

#[test]
fn silent_runs_print_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    fs::create_dir(&source).expect("mkdir");
    fs::write(source.join("f.txt"), b"x").expect("write");

    oc_mirror()
        .args(["--source"])
        .arg(&source)
        .args(["--target"])
        .arg(temp.path().join("target"))
        .args(["--verbosity", "0"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn default_verbosity_narrates_mutations_only() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    fs::create_dir(&source).expect("mkdir");
    fs::write(source.join("f.txt"), b"x").expect("write");

    oc_mirror()
        .args(["--source"])
        .arg(&source)
        .args(["--target"])
        .arg(temp.path().join("target"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("creating file")
                .and(predicate::str::contains("checking").not()),
        );
}
