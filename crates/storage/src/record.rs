// SPDX-License-Identifier: MIT

//! On-disk shapes for the `.detent` store (spec.md §4.9).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use detent_core::{Diagnostic, RunIdentity};

pub const SCHEMA_VERSION: u32 = 1;

/// One record per run, written once and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub v: u32,
    pub identity: RunIdentity,
    /// The single workflow file this run targeted, or `"all"` when every
    /// workflow in the directory was driven (spec.md §3 `workflowName`).
    pub workflow_name: String,
    pub started_at: i64,
    pub finished_at: i64,
    pub exit_code: i32,
    pub cancelled: bool,
    /// `contentHash` of every diagnostic this run produced, for
    /// [`crate::Store::list_errors_by_run`] to resolve against the
    /// diagnostics table.
    pub diagnostic_hashes: Vec<String>,
    /// Lines that looked error-like but matched no registered parser
    /// (spec.md §4.8), carried through so the persisted record exposes the
    /// same telemetry the extractor computed.
    pub unmatched_error_like: u32,
}

impl RunRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: RunIdentity,
        workflow_name: impl Into<String>,
        started_at: i64,
        finished_at: i64,
        exit_code: i32,
        cancelled: bool,
        diagnostics: &[Diagnostic],
        unmatched_error_like: u32,
    ) -> Self {
        Self {
            v: SCHEMA_VERSION,
            identity,
            workflow_name: workflow_name.into(),
            started_at,
            finished_at,
            exit_code,
            cancelled,
            diagnostic_hashes: diagnostics.iter().map(|d| d.content_hash.clone()).collect(),
            unmatched_error_like,
        }
    }
}

/// A diagnostic plus the bookkeeping needed to decide whether it survives
/// garbage collection: which runs currently reference it, and whether a
/// consumer has acknowledged it (spec.md §4.8 open question, §4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub v: u32,
    pub diagnostic: Diagnostic,
    pub acknowledged: bool,
    pub referencing_runs: BTreeSet<String>,
}

impl DiagnosticRecord {
    pub fn new(diagnostic: Diagnostic, run_id: &str) -> Self {
        let mut referencing_runs = BTreeSet::new();
        referencing_runs.insert(run_id.to_string());
        Self {
            v: SCHEMA_VERSION,
            diagnostic,
            acknowledged: false,
            referencing_runs,
        }
    }

    /// An "open" diagnostic is one nobody has acknowledged yet, independent
    /// of whether the run(s) that produced it still exist (spec.md §9).
    pub fn is_open(&self) -> bool {
        !self.acknowledged
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
