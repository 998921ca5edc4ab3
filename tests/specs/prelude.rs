//! Test helpers for detent's black-box behavioral specifications.
//!
//! Each spec drives the `detent` binary against a scripted fake runner in
//! place of the real external container-based runner (out of scope for this
//! crate, spec.md §1), then inspects the persisted run record.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::cargo::CommandCargoExt;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git").args(args).current_dir(dir).status().unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

/// Writes an executable shell script standing in for the external runner
/// (`act`), which this crate shells out to but never implements.
#[cfg(unix)]
pub fn fake_runner(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake-runner.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// A scratch repository with a `.github/workflows/ci.yml`, ready to run
/// `detent` against.
pub struct Project {
    dir: tempfile::TempDir,
    config_dir: tempfile::TempDir,
}

impl Project {
    pub fn new(workflow_yaml: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        git(root, &["init", "-q"]);
        git(root, &["config", "user.email", "test@example.com"]);
        git(root, &["config", "user.name", "Test"]);

        let workflow_dir = root.join(".github/workflows");
        std::fs::create_dir_all(&workflow_dir).unwrap();
        std::fs::write(workflow_dir.join("ci.yml"), workflow_yaml).unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "init"]);

        Self {
            dir,
            config_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Configures `detent` to shell out to a fake runner script whose body
    /// is `runner_body`, then builds the command to run it against this
    /// project in an isolated config directory.
    pub fn detent(&self, runner_body: &str) -> Command {
        let script = fake_runner(self.path(), runner_body);
        let mut cmd = Command::cargo_bin("detent").unwrap();
        cmd.current_dir(self.path())
            .env("DETENT_RUNNER_BINARY", &script)
            .env("DETENT_CONFIG_DIR", self.config_dir.path())
            .env_remove("DETENT_LOG_FILE");
        cmd
    }

    /// Reads back the persisted run record for `run_id` from the `.detent` store.
    pub fn run_record(&self, run_id: &str) -> detent_storage::RunRecord {
        let store = detent_storage::Store::open(self.path().join(".detent")).unwrap();
        store.get_run(run_id).unwrap()
    }

    /// The run id `detent` would compute for this project's current HEAD.
    pub fn run_id(&self) -> String {
        detent_orchestrator::compute_identity(self.path()).unwrap().id.as_str().to_string()
    }
}
