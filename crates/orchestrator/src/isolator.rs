// SPDX-License-Identifier: MIT

//! Ephemeral checkout creation and teardown (spec.md §4.4), using `git
//! worktree` the way the teacher lineage's worktree helpers do (see
//! `ohitslaurence-agent-loop`'s `git.rs`/`worktree.rs` in the retrieval pack):
//! a linked working tree at the run's commit, writable without touching
//! `repoRoot`.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use detent_core::{DetentError, ErrorKind, RunId};

const CLEANUP_TIMEOUT: Duration = Duration::from_secs(30);

/// One ephemeral working tree, owned exclusively by the orchestrator that
/// created it until `cleanup` runs (spec.md §5).
#[derive(Debug)]
pub struct Checkout {
    pub path: PathBuf,
    repo_root: PathBuf,
    pid_file: PathBuf,
}

impl Checkout {
    /// Removes the working tree and its pid marker. Idempotent: calling this
    /// twice, or after the directory is already gone, is not an error.
    pub async fn cleanup(self) -> Result<(), DetentError> {
        let repo_root = self.repo_root.clone();
        let path = self.path.clone();
        let result = tokio::time::timeout(
            CLEANUP_TIMEOUT,
            tokio::task::spawn_blocking(move || remove_worktree(&repo_root, &path)),
        )
        .await;

        let _ = std::fs::remove_file(&self.pid_file);

        match result {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(DetentError::with_source(
                ErrorKind::IsolationFailed,
                "checkout cleanup task panicked",
                std::io::Error::other(e.to_string()),
            )),
            Err(_) => Err(DetentError::new(
                ErrorKind::IsolationFailed,
                format!(
                    "removing checkout {} did not finish within 30s",
                    self.path.display()
                ),
            )),
        }
    }
}

fn remove_worktree(repo_root: &Path, path: &Path) -> Result<(), DetentError> {
    if !path.exists() {
        return Ok(());
    }
    let out = Command::new("git")
        .args(["worktree", "remove", "--force", &path.to_string_lossy()])
        .current_dir(repo_root)
        .output()
        .map_err(|e| io_to_isolation_error(path, e))?;
    if !out.status.success() {
        return Err(DetentError::new(
            ErrorKind::IsolationFailed,
            format!(
                "git worktree remove {}: {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr)
            ),
        ));
    }
    Ok(())
}

fn io_to_isolation_error(path: &Path, source: std::io::Error) -> DetentError {
    DetentError::with_source(
        ErrorKind::IsolationFailed,
        format!("failed to remove checkout {}", path.display()),
        source,
    )
}

/// Creates and reclaims ephemeral checkouts under `checkouts_root`, one
/// subdirectory per run id.
pub struct Isolator {
    repo_root: PathBuf,
    checkouts_root: PathBuf,
}

impl Isolator {
    pub fn new(repo_root: impl Into<PathBuf>, checkouts_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            checkouts_root: checkouts_root.into(),
        }
    }

    fn checkout_path(&self, run_id: &RunId) -> PathBuf {
        self.checkouts_root.join(run_id.as_str())
    }

    fn pid_file(&self, run_id: &RunId) -> PathBuf {
        self.checkouts_root.join(format!("{}.pid", run_id.as_str()))
    }

    /// Creates a standalone working tree at `commit`, rooted at a directory
    /// unique to `run_id`. Writes a pid marker so a future orphan sweep can
    /// tell this checkout's owning process apart from a crashed one.
    pub async fn create(&self, run_id: &RunId, commit: &str) -> Result<Checkout, DetentError> {
        std::fs::create_dir_all(&self.checkouts_root).map_err(|e| {
            DetentError::with_source(
                ErrorKind::IsolationFailed,
                format!(
                    "could not create checkouts root {}",
                    self.checkouts_root.display()
                ),
                e,
            )
        })?;

        let path = self.checkout_path(run_id);
        let repo_root = self.repo_root.clone();
        let commit = commit.to_string();
        let create_path = path.clone();
        tokio::task::spawn_blocking(move || create_worktree(&repo_root, &create_path, &commit))
            .await
            .map_err(|e| {
                DetentError::with_source(
                    ErrorKind::IsolationFailed,
                    "checkout creation task panicked",
                    std::io::Error::other(e.to_string()),
                )
            })??;

        let pid_file = self.pid_file(run_id);
        std::fs::write(&pid_file, std::process::id().to_string()).map_err(|e| {
            DetentError::with_source(
                ErrorKind::IsolationFailed,
                format!("could not write pid marker {}", pid_file.display()),
                e,
            )
        })?;

        Ok(Checkout {
            path,
            repo_root: self.repo_root.clone(),
            pid_file,
        })
    }

    /// Sweeps `checkouts_root` for pid markers whose owning process no
    /// longer exists and reclaims them (spec.md §4.4: orphan recovery on
    /// startup). Returns the number reclaimed.
    pub fn sweep_orphans(&self) -> usize {
        let Ok(entries) = std::fs::read_dir(&self.checkouts_root) else {
            return 0;
        };

        let mut reclaimed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("pid") {
                continue;
            }
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            let Ok(pid) = contents.trim().parse::<u32>() else {
                continue;
            };
            if process_is_alive(pid) {
                continue;
            }

            let run_id_str = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            let checkout_dir = self.checkouts_root.join(run_id_str);
            if remove_worktree(&self.repo_root, &checkout_dir).is_ok() {
                let _ = std::fs::remove_file(&path);
                reclaimed += 1;
                tracing::info!(run_id = run_id_str, pid, "reclaimed orphaned checkout");
            }
        }
        reclaimed
    }
}

#[cfg(unix)]
fn process_is_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(unix))]
fn process_is_alive(_pid: u32) -> bool {
    // No portable liveness check without a platform-specific API; assume
    // alive so cross-platform hosts never reclaim a checkout in use.
    true
}

fn create_worktree(repo_root: &Path, path: &Path, commit: &str) -> Result<(), DetentError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_to_isolation_error(path, e))?;
    }
    let out = Command::new("git")
        .args(["worktree", "add", "--detach", &path.to_string_lossy(), commit])
        .current_dir(repo_root)
        .output()
        .map_err(|e| io_to_isolation_error(path, e))?;
    if !out.status.success() {
        return Err(DetentError::new(
            ErrorKind::IsolationFailed,
            format!(
                "git worktree add {} {}: {}",
                path.display(),
                commit,
                String::from_utf8_lossy(&out.stderr)
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "isolator_tests.rs"]
mod tests;
