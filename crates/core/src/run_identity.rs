// SPDX-License-Identifier: MIT

//! The data shape produced by run-identity computation.
//!
//! The algorithm that fills this in (shelling out to the repository's VCS) lives in
//! `detent-orchestrator::identity`; this crate only defines the result shape so both
//! the orchestrator and storage/transformer layers can share it without a cyclic
//! crate dependency.

use serde::{Deserialize, Serialize};

use crate::ids::RunId;

/// Content-derived run identity: `id` is stable for a given `(commit, tree)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    pub id: RunId,
    pub commit: String,
    pub tree: String,
    /// Whether the working tree had uncommitted tracked changes at computation time.
    /// Recorded with the run but does not affect `id`.
    pub dirty: bool,
}

impl RunIdentity {
    pub fn new(id: RunId, commit: String, tree: String, dirty: bool) -> Self {
        Self {
            id,
            commit,
            tree,
            dirty,
        }
    }
}

#[cfg(test)]
#[path = "run_identity_tests.rs"]
mod tests;
