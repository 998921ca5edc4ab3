// SPDX-License-Identifier: MIT

//! `RunConfig`: the immutable configuration an orchestrator is constructed from.

use std::path::{Path, PathBuf};

use crate::error::{DetentError, ErrorKind};
use crate::ids::RunId;

/// Presentation hints the driver consumes; the core treats both as opaque flags it
/// forwards, never branches on beyond passing them through to the subprocess driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentationHints {
    pub use_tui: bool,
    pub stream_output: bool,
}

/// Immutable run configuration, validated at construction.
#[derive(Debug, Clone)]
pub struct RunConfig {
    repo_root: PathBuf,
    workflow_dir: PathBuf,
    workflow_file: Option<String>,
    event: String,
    run_id: RunId,
    presentation: PresentationHints,
}

fn is_valid_event_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_valid_run_id(s: &str) -> bool {
    s.len() == 16 && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

impl RunConfig {
    /// Validates and constructs a `RunConfig`.
    ///
    /// `workflow_dir` must already be an absolute path inside `repo_root` and must
    /// not itself be a symlink; callers are expected to have resolved and canonicalized
    /// paths before calling this (the orchestrator's Prepare phase does so via
    /// `std::fs::canonicalize` before handing paths here, so this constructor only
    /// re-checks containment, not symlink-ness of intermediate components).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repo_root: impl Into<PathBuf>,
        workflow_dir: impl Into<PathBuf>,
        workflow_file: Option<String>,
        event: impl Into<String>,
        run_id: impl Into<String>,
        presentation: PresentationHints,
    ) -> Result<Self, DetentError> {
        let repo_root = repo_root.into();
        let workflow_dir = workflow_dir.into();
        let event = event.into();
        let run_id = run_id.into();

        if !repo_root.is_absolute() {
            return Err(DetentError::new(
                ErrorKind::InvalidConfig,
                format!("repoRoot must be absolute: {}", repo_root.display()),
            ));
        }
        if !workflow_dir.is_absolute() {
            return Err(DetentError::new(
                ErrorKind::InvalidConfig,
                format!("workflowDir must be absolute: {}", workflow_dir.display()),
            ));
        }
        if !workflow_dir.starts_with(&repo_root) {
            return Err(DetentError::new(
                ErrorKind::InvalidConfig,
                "workflowDir must be inside repoRoot",
            ));
        }
        if !is_valid_event_token(&event) {
            return Err(DetentError::new(
                ErrorKind::InvalidConfig,
                format!("event must be alphanumeric/_/-: {event:?}"),
            ));
        }
        if !is_valid_run_id(&run_id) {
            return Err(DetentError::new(
                ErrorKind::InvalidConfig,
                format!("runID must be 16 lowercase hex characters: {run_id:?}"),
            ));
        }
        if let Some(ref file) = workflow_file {
            if file.is_empty() || file.contains(std::path::is_separator) {
                return Err(DetentError::new(
                    ErrorKind::InvalidConfig,
                    format!("workflowFile must be a bare filename: {file:?}"),
                ));
            }
        }

        Ok(Self {
            repo_root,
            workflow_dir,
            workflow_file,
            event,
            run_id: RunId::new(run_id),
            presentation,
        })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn workflow_dir(&self) -> &Path {
        &self.workflow_dir
    }

    pub fn workflow_file(&self) -> Option<&str> {
        self.workflow_file.as_deref()
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn presentation(&self) -> PresentationHints {
        self.presentation
    }
}

#[cfg(test)]
#[path = "run_config_tests.rs"]
mod tests;
