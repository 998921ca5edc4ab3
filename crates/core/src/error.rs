// SPDX-License-Identifier: MIT

//! Cross-cutting error taxonomy shared by every `detent-*` crate.
//!
//! Individual crates define their own `thiserror` enums for their own operations
//! (`detent_transformer::TransformError`, `detent_driver::DriverError`, ...); this
//! module defines the coarse [`ErrorKind`] those enums collapse into at the
//! orchestrator boundary, and [`DetentError`], the wrapper the orchestrator's
//! phase methods return so callers can match on `.kind()` without downcasting.

use std::fmt;

/// Coarse error classification, used for exit-code mapping and CLI-facing messages.
/// Mirrors the taxonomy table in the core specification's error handling section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfig,
    NoRepository,
    NoHistory,
    PreflightFailed,
    Unsupported,
    IsolationFailed,
    TransformFailed,
    RunnerFailed,
    Cancelled,
    PersistFailed,
    Locked,
}

impl ErrorKind {
    /// Whether this kind represents a terminal-but-ok outcome rather than a failure.
    pub fn is_ok_outcome(&self) -> bool {
        matches!(self, ErrorKind::Cancelled)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidConfig => "invalid_config",
            ErrorKind::NoRepository => "no_repository",
            ErrorKind::NoHistory => "no_history",
            ErrorKind::PreflightFailed => "preflight_failed",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::IsolationFailed => "isolation_failed",
            ErrorKind::TransformFailed => "transform_failed",
            ErrorKind::RunnerFailed => "runner_failed",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::PersistFailed => "persist_failed",
            ErrorKind::Locked => "locked",
        };
        write!(f, "{s}")
    }
}

/// The error type returned across crate boundaries by orchestrator-facing operations.
///
/// Carries a coarse [`ErrorKind`] plus the underlying cause, the way `oj-engine`'s
/// `RuntimeError` wraps an `ExecuteError` without discarding it.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct DetentError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl DetentError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
