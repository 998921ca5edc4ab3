// SPDX-License-Identifier: MIT

//! Run identity computation (spec.md §4.2): a 16-hex id derived from the
//! repository's current commit and tracked-tree hash, shelled out to `git`
//! the way the teacher's worktree helpers do (`git rev-parse`, `git status
//! --porcelain`).

use std::path::Path;
use std::process::Command;

use sha2::{Digest, Sha256};

use detent_core::{DetentError, ErrorKind, RunId, RunIdentity};

fn run_git(repo_root: &Path, args: &[&str]) -> Result<std::process::Output, DetentError> {
    Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .map_err(|source| {
            DetentError::with_source(
                ErrorKind::NoRepository,
                format!("failed to execute git in {}", repo_root.display()),
                source,
            )
        })
}

fn stdout_trimmed(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Computes the run identity for `repo_root` (spec.md §4.2).
///
/// Fails with `NoRepository` if `repo_root` is not inside a git working
/// tree, `NoHistory` if it has no commits yet.
pub fn compute(repo_root: &Path) -> Result<RunIdentity, DetentError> {
    let inside = run_git(repo_root, &["rev-parse", "--is-inside-work-tree"])?;
    if !inside.status.success() || stdout_trimmed(&inside) != "true" {
        return Err(DetentError::new(
            ErrorKind::NoRepository,
            format!("{} is not a git working tree", repo_root.display()),
        ));
    }

    let commit_out = run_git(repo_root, &["rev-parse", "HEAD"])?;
    if !commit_out.status.success() {
        return Err(DetentError::new(
            ErrorKind::NoHistory,
            "repository has no commits",
        ));
    }
    let commit = stdout_trimmed(&commit_out);

    // `write-tree` hashes the current index, which is what spec.md §4.2 means
    // by "the hash the VCS would compute for the current index contents" —
    // distinct from `HEAD^{tree}`, which ignores staged-but-uncommitted changes.
    let tree_out = run_git(repo_root, &["write-tree"])?;
    if !tree_out.status.success() {
        return Err(DetentError::with_source(
            ErrorKind::NoRepository,
            "failed to hash working tree",
            std::io::Error::other(String::from_utf8_lossy(&tree_out.stderr).into_owned()),
        ));
    }
    let tree = stdout_trimmed(&tree_out);

    let status_out = run_git(repo_root, &["status", "--porcelain", "--untracked-files=no"])?;
    let dirty = !stdout_trimmed(&status_out).is_empty();

    let mut hasher = Sha256::new();
    hasher.update(commit.as_bytes());
    hasher.update(tree.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    let id = RunId::new(&digest[..16]);

    Ok(RunIdentity::new(id, commit, tree, dirty))
}

/// The repository's very first commit, used to scope the sensitive-job
/// allow-list (spec.md §4.5 step 3) to repository identity rather than path.
pub fn first_commit(repo_root: &Path) -> Result<String, DetentError> {
    let out = run_git(
        repo_root,
        &["rev-list", "--max-parents=0", "HEAD"],
    )?;
    if !out.status.success() {
        return Err(DetentError::new(
            ErrorKind::NoHistory,
            "repository has no commits",
        ));
    }
    let text = stdout_trimmed(&out);
    // A repository with multiple root commits (rare, e.g. after a history
    // merge) lists more than one; the first line is the deterministic choice.
    text.lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| DetentError::new(ErrorKind::NoHistory, "repository has no commits"))
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
