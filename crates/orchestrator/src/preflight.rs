// SPDX-License-Identifier: MIT

//! Parallel, short-circuiting preflight checks (spec.md §4.3).
//!
//! `PreflightCheck` is a trait object registry, the same design the
//! extractor uses for its line parsers (spec.md §4.8, SPEC_FULL.md §C.1):
//! the five checks spec.md names are the default registrations, not a
//! closed list.

use std::path::Path;
use std::process::Command;

use detent_core::{DetentError, ErrorKind, RunConfig};

#[derive(Debug, Clone)]
pub enum CheckOutcome {
    Pass,
    Fail(String),
}

#[async_trait::async_trait]
pub trait PreflightCheck: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self, cfg: &RunConfig) -> CheckOutcome;
}

/// Runs every check concurrently; the first failure observed cancels the
/// remaining tasks (spec.md §4.3, §5). Success requires every check to pass.
pub async fn run_preflight(
    cfg: &RunConfig,
    checks: Vec<Box<dyn PreflightCheck>>,
) -> Result<(), DetentError> {
    let mut set = tokio::task::JoinSet::new();
    for check in checks {
        let cfg = cfg.clone();
        set.spawn(async move {
            let name = check.name();
            (name, check.run(&cfg).await)
        });
    }

    let mut failure = None;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, CheckOutcome::Pass)) => {}
            Ok((name, CheckOutcome::Fail(reason))) => {
                failure = Some(format!("{name}: {reason}"));
                break;
            }
            Err(e) => {
                failure = Some(format!("preflight check panicked: {e}"));
                break;
            }
        }
    }
    // Dropping the JoinSet aborts every task still in flight, satisfying
    // "first failure cancels the others".
    set.abort_all();

    match failure {
        Some(reason) => Err(DetentError::new(ErrorKind::PreflightFailed, reason)),
        None => Ok(()),
    }
}

/// Repository present and addressable at `repoRoot`.
pub struct RepositoryPresentCheck;

#[async_trait::async_trait]
impl PreflightCheck for RepositoryPresentCheck {
    fn name(&self) -> &'static str {
        "repository-present"
    }

    async fn run(&self, cfg: &RunConfig) -> CheckOutcome {
        let repo_root = cfg.repo_root().to_path_buf();
        match tokio::task::spawn_blocking(move || {
            Command::new("git")
                .args(["rev-parse", "--is-inside-work-tree"])
                .current_dir(&repo_root)
                .output()
        })
        .await
        {
            Ok(Ok(out)) if out.status.success() => CheckOutcome::Pass,
            Ok(Ok(_)) => CheckOutcome::Fail("not a git working tree".to_string()),
            Ok(Err(e)) => CheckOutcome::Fail(format!("git not usable: {e}")),
            Err(e) => CheckOutcome::Fail(format!("check task failed: {e}")),
        }
    }
}

/// The external runner binary (spec.md §1: "executes GitHub Actions
/// workflows locally via an external container-based workflow runner") is
/// installed and answers `--version`.
pub struct RunnerBinaryCheck {
    pub binary: String,
}

impl Default for RunnerBinaryCheck {
    fn default() -> Self {
        Self {
            binary: "act".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl PreflightCheck for RunnerBinaryCheck {
    fn name(&self) -> &'static str {
        "runner-binary"
    }

    async fn run(&self, _cfg: &RunConfig) -> CheckOutcome {
        let binary = self.binary.clone();
        match tokio::task::spawn_blocking(move || Command::new(&binary).arg("--version").output())
            .await
        {
            Ok(Ok(out)) if out.status.success() => CheckOutcome::Pass,
            Ok(Ok(out)) => CheckOutcome::Fail(format!(
                "runner binary exited {}",
                out.status.code().unwrap_or(-1)
            )),
            Ok(Err(e)) => CheckOutcome::Fail(format!("runner binary not found: {e}")),
            Err(e) => CheckOutcome::Fail(format!("check task failed: {e}")),
        }
    }
}

/// The container engine the runner shells out to is reachable.
pub struct ContainerEngineCheck {
    pub binary: String,
}

impl Default for ContainerEngineCheck {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl PreflightCheck for ContainerEngineCheck {
    fn name(&self) -> &'static str {
        "container-engine"
    }

    async fn run(&self, _cfg: &RunConfig) -> CheckOutcome {
        let binary = self.binary.clone();
        match tokio::task::spawn_blocking(move || Command::new(&binary).arg("info").output())
            .await
        {
            Ok(Ok(out)) if out.status.success() => CheckOutcome::Pass,
            Ok(Ok(_)) => CheckOutcome::Fail("container engine not reachable".to_string()),
            Ok(Err(e)) => CheckOutcome::Fail(format!("container engine not found: {e}")),
            Err(e) => CheckOutcome::Fail(format!("check task failed: {e}")),
        }
    }
}

fn git_submodules(repo_root: &Path) -> std::io::Result<String> {
    let out = Command::new("git")
        .args(["config", "--file", ".gitmodules", "--get-regexp", "path"])
        .current_dir(repo_root)
        .output()?;
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// No submodules inside `repoRoot` (spec.md §4.3: fails `Unsupported`; this
/// check surfaces it as a preflight failure, the orchestrator's Prepare
/// phase maps it to `ErrorKind::Unsupported` — see `orchestrator::prepare`).
pub struct NoSubmodulesCheck;

#[async_trait::async_trait]
impl PreflightCheck for NoSubmodulesCheck {
    fn name(&self) -> &'static str {
        "no-submodules"
    }

    async fn run(&self, cfg: &RunConfig) -> CheckOutcome {
        let repo_root = cfg.repo_root().to_path_buf();
        match tokio::task::spawn_blocking(move || {
            repo_root
                .join(".gitmodules")
                .exists()
                .then(|| git_submodules(&repo_root))
        })
        .await
        {
            Ok(None) => CheckOutcome::Pass,
            Ok(Some(Ok(listing))) if listing.trim().is_empty() => CheckOutcome::Pass,
            Ok(Some(Ok(_))) => {
                CheckOutcome::Fail("repository contains submodules, which are unsupported".to_string())
            }
            Ok(Some(Err(e))) => CheckOutcome::Fail(format!("could not read .gitmodules: {e}")),
            Err(e) => CheckOutcome::Fail(format!("check task failed: {e}")),
        }
    }
}

fn find_escaping_symlink(repo_root: &Path) -> std::io::Result<Option<String>> {
    let out = Command::new("git")
        .args(["ls-files", "-s"])
        .current_dir(repo_root)
        .output()?;
    let listing = String::from_utf8_lossy(&out.stdout);
    for line in listing.lines() {
        // `120000 <blob> 0\t<path>` marks a symlink blob mode.
        let Some((mode_etc, path)) = line.split_once('\t') else {
            continue;
        };
        if !mode_etc.starts_with("120000") {
            continue;
        }
        let target = std::fs::read_link(repo_root.join(path)).unwrap_or_default();
        let resolved = repo_root.join(path).parent().unwrap_or(repo_root).join(&target);
        let canonical = resolved.canonicalize().unwrap_or(resolved);
        if !canonical.starts_with(repo_root) {
            return Ok(Some(path.to_string()));
        }
    }
    Ok(None)
}

/// No tracked symbolic links escaping `repoRoot` (spec.md §4.3: fail
/// `Unsupported`).
pub struct NoEscapingSymlinksCheck;

#[async_trait::async_trait]
impl PreflightCheck for NoEscapingSymlinksCheck {
    fn name(&self) -> &'static str {
        "no-escaping-symlinks"
    }

    async fn run(&self, cfg: &RunConfig) -> CheckOutcome {
        let repo_root = cfg.repo_root().to_path_buf();
        match tokio::task::spawn_blocking(move || find_escaping_symlink(&repo_root)).await {
            Ok(Ok(None)) => CheckOutcome::Pass,
            Ok(Ok(Some(path))) => {
                CheckOutcome::Fail(format!("tracked symlink `{path}` escapes the repository root"))
            }
            Ok(Err(e)) => CheckOutcome::Fail(format!("could not enumerate tracked files: {e}")),
            Err(e) => CheckOutcome::Fail(format!("check task failed: {e}")),
        }
    }
}

/// The default preflight registry (spec.md §4.3's five checks).
pub fn default_checks() -> Vec<Box<dyn PreflightCheck>> {
    vec![
        Box::new(RepositoryPresentCheck),
        Box::new(RunnerBinaryCheck::default()),
        Box::new(ContainerEngineCheck::default()),
        Box::new(NoSubmodulesCheck),
        Box::new(NoEscapingSymlinksCheck),
    ]
}

#[cfg(test)]
#[path = "preflight_tests.rs"]
mod tests;
