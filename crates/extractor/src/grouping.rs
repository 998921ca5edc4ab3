// SPDX-License-Identifier: MIT

//! Post-processing step 4 (spec.md §4.8): the two groupings downstream
//! consumers (persistence, the AI subsystem) read instead of re-deriving.

use std::collections::BTreeMap;

use detent_core::Diagnostic;

pub const UNLOCATED_FILE_KEY: &str = "";

/// Groups by file path relative to the repo root. Diagnostics without a
/// `file` land under [`UNLOCATED_FILE_KEY`] rather than being dropped.
pub fn group_by_file(diagnostics: &[Diagnostic]) -> BTreeMap<String, Vec<Diagnostic>> {
    let mut groups: BTreeMap<String, Vec<Diagnostic>> = BTreeMap::new();
    for diag in diagnostics {
        let key = diag.file.clone().unwrap_or_else(|| UNLOCATED_FILE_KEY.to_string());
        groups.entry(key).or_default().push(diag.clone());
    }
    groups
}

pub fn group_by_category(diagnostics: &[Diagnostic]) -> BTreeMap<String, Vec<Diagnostic>> {
    let mut groups: BTreeMap<String, Vec<Diagnostic>> = BTreeMap::new();
    for diag in diagnostics {
        groups
            .entry(diag.category.clone())
            .or_default()
            .push(diag.clone());
    }
    groups
}

#[cfg(test)]
#[path = "grouping_tests.rs"]
mod tests;
