// SPDX-License-Identifier: MIT

//! Post-processing step 3 (spec.md §4.8): dedup by `contentHash`, keeping
//! the first occurrence.

use std::collections::HashSet;

use detent_core::Diagnostic;

pub fn dedupe_by_content_hash(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    diagnostics
        .into_iter()
        .filter(|d| seen.insert(d.content_hash.clone()))
        .collect()
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
