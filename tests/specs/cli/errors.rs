//! spec.md §7: a failure before Prepare completes is reported on stderr and
//! exits 1, with nothing persisted.

use crate::prelude::*;

#[test]
fn nonexistent_repo_root_fails_fast_with_exit_code_one() {
    let mut cmd = assert_cmd::Command::cargo_bin("detent").unwrap();
    cmd.arg("/nonexistent/detent-spec-test-path");
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}

#[test]
fn directory_outside_any_git_work_tree_fails_identity_computation() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = assert_cmd::Command::cargo_bin("detent").unwrap();
    cmd.current_dir(dir.path());
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}
