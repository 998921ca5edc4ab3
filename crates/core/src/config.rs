// SPDX-License-Identifier: MIT

//! User-scoped configuration: sensitive-job allow-list, trusted repositories, and
//! the tunables spec.md leaves as "e.g." defaults.
//!
//! Resolution mirrors the teacher's `DETENT_STATE_DIR`/`XDG_*`/`$HOME` fallback
//! chain: `DETENT_CONFIG_DIR` > `XDG_CONFIG_HOME/detent` > `~/.config/detent`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DetentError, ErrorKind};

/// Default job-level timeout (minutes) injected when a job declares none.
pub const DEFAULT_JOB_TIMEOUT_MINUTES: u32 = 30;
/// Default step-level timeout (minutes) injected when a step declares none.
pub const DEFAULT_STEP_TIMEOUT_MINUTES: u32 = 10;
/// Default size of each stdout/stderr ring buffer, in bytes.
pub const DEFAULT_RING_BUFFER_BYTES: usize = 50 * 1024 * 1024;
/// Default GC retention window, in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Name substrings that mark a job or workflow file as sensitive by default.
pub const DEFAULT_SENSITIVE_PATTERNS: &[&str] = &["release", "deploy", "publish"];

/// Directory name under the config root, matching the CLI's own branding-free name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// User-scoped configuration, loaded once per invocation and treated as
/// immutable for the lifetime of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sensitive-job allow-list, keyed by the first commit SHA of the repository
    /// (per spec.md §4.5.3: the allow-list scope is pinned to repository identity,
    /// not path, so a clone or rename doesn't silently drop it).
    #[serde(default)]
    pub allowed_sensitive_jobs: BTreeMap<String, BTreeSet<String>>,

    /// Repository roots (absolute paths) the user has explicitly marked trusted.
    #[serde(default)]
    pub trusted_repositories: BTreeSet<PathBuf>,

    /// Substrings that mark a job/workflow name as sensitive.
    #[serde(default = "default_sensitive_patterns")]
    pub sensitive_patterns: Vec<String>,

    #[serde(default = "default_job_timeout")]
    pub default_job_timeout_minutes: u32,

    #[serde(default = "default_step_timeout")]
    pub default_step_timeout_minutes: u32,

    #[serde(default = "default_ring_buffer")]
    pub ring_buffer_bytes: usize,

    #[serde(default = "default_retention")]
    pub retention_days: u32,
}

fn default_sensitive_patterns() -> Vec<String> {
    DEFAULT_SENSITIVE_PATTERNS.iter().map(|s| s.to_string()).collect()
}
fn default_job_timeout() -> u32 {
    DEFAULT_JOB_TIMEOUT_MINUTES
}
fn default_step_timeout() -> u32 {
    DEFAULT_STEP_TIMEOUT_MINUTES
}
fn default_ring_buffer() -> usize {
    DEFAULT_RING_BUFFER_BYTES
}
fn default_retention() -> u32 {
    DEFAULT_RETENTION_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_sensitive_jobs: BTreeMap::new(),
            trusted_repositories: BTreeSet::new(),
            sensitive_patterns: default_sensitive_patterns(),
            default_job_timeout_minutes: default_job_timeout(),
            default_step_timeout_minutes: default_step_timeout(),
            ring_buffer_bytes: default_ring_buffer(),
            retention_days: default_retention(),
        }
    }
}

impl Config {
    /// Resolve the directory the config file lives in: `DETENT_CONFIG_DIR` >
    /// `XDG_CONFIG_HOME/detent` > `~/.config/detent`.
    pub fn config_dir() -> Result<PathBuf, DetentError> {
        if let Ok(dir) = std::env::var("DETENT_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg).join("detent"));
        }
        let home = dirs::home_dir().ok_or_else(|| {
            DetentError::new(ErrorKind::InvalidConfig, "cannot resolve home directory")
        })?;
        Ok(home.join(".config").join("detent"))
    }

    /// Load the config file, falling back to defaults if it doesn't exist yet.
    pub fn load() -> Result<Self, DetentError> {
        let dir = Self::config_dir()?;
        Self::load_from(&dir.join(CONFIG_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self, DetentError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| {
                DetentError::with_source(
                    ErrorKind::InvalidConfig,
                    format!("malformed config at {}", path.display()),
                    e,
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DetentError::with_source(
                ErrorKind::InvalidConfig,
                format!("cannot read config at {}", path.display()),
                e,
            )),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), DetentError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DetentError::with_source(
                    ErrorKind::InvalidConfig,
                    format!("cannot create config dir {}", parent.display()),
                    e,
                )
            })?;
        }
        let body = toml::to_string_pretty(self).map_err(|e| {
            DetentError::with_source(ErrorKind::InvalidConfig, "cannot serialize config", e)
        })?;
        std::fs::write(path, body).map_err(|e| {
            DetentError::with_source(
                ErrorKind::InvalidConfig,
                format!("cannot write config to {}", path.display()),
                e,
            )
        })
    }

    /// Whether `job_name` is allow-listed for `repo_first_commit`.
    pub fn is_job_allowed(&self, repo_first_commit: &str, job_name: &str) -> bool {
        self.allowed_sensitive_jobs
            .get(repo_first_commit)
            .is_some_and(|jobs| jobs.contains(job_name))
    }

    /// Whether `name` matches one of the configured sensitive-name substrings,
    /// case-insensitively (job/workflow names are user-authored display text,
    /// not the job-id shell-safety pattern `ids::JobId` enforces separately).
    pub fn matches_sensitive_pattern(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        self.sensitive_patterns
            .iter()
            .any(|pat| lower.contains(&pat.to_ascii_lowercase()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
