// SPDX-License-Identifier: MIT

//! Ties the registry and post-processing steps together into the pipeline
//! described in spec.md §4.8.

use std::collections::BTreeMap;
use std::path::Path;

use detent_core::Diagnostic;

use crate::dedup::dedupe_by_content_hash;
use crate::grouping::{group_by_category, group_by_file};
use crate::registry::ParserRegistry;
use crate::severity::{apply_severity_rules, SeverityRule};
use crate::snippet::{attach_snippets, SnippetStats};
use crate::telemetry::{unknown_diagnostic, UnmatchedTelemetry};

#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub diagnostics: Vec<Diagnostic>,
    pub unmatched: UnmatchedTelemetry,
    pub snippet_stats: SnippetStats,
    pub by_file: BTreeMap<String, Vec<Diagnostic>>,
    pub by_category: BTreeMap<String, Vec<Diagnostic>>,
}

pub struct Extractor {
    registry: ParserRegistry,
    severity_rules: Vec<SeverityRule>,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            registry: ParserRegistry::with_defaults(),
            severity_rules: Vec::new(),
        }
    }

    pub fn with_registry(registry: ParserRegistry) -> Self {
        Self {
            registry,
            severity_rules: Vec::new(),
        }
    }

    pub fn with_severity_rules(mut self, rules: Vec<SeverityRule>) -> Self {
        self.severity_rules = rules;
        self
    }

    /// Runs every line from a single stream through the full pipeline:
    /// match, classify unmatched lines, apply severity overrides, attach
    /// snippets, dedup, and group. `checkout_root` is where `file` fields
    /// are resolved for snippet reads.
    pub fn extract<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a str>,
        checkout_root: &Path,
    ) -> ExtractionResult {
        let mut diagnostics = Vec::new();
        let mut unmatched = UnmatchedTelemetry::default();

        for line in lines {
            match self.registry.parse_line(line) {
                Some(mut matched) => diagnostics.append(&mut matched),
                None => {
                    if crate::telemetry::looks_error_like(line) {
                        unmatched.error_like += 1;
                        diagnostics.push(unknown_diagnostic(line));
                    } else {
                        unmatched.other += 1;
                    }
                }
            }
        }

        apply_severity_rules(&mut diagnostics, &self.severity_rules);
        let snippet_stats = attach_snippets(&mut diagnostics, checkout_root);
        let diagnostics = dedupe_by_content_hash(diagnostics);
        let by_file = group_by_file(&diagnostics);
        let by_category = group_by_category(&diagnostics);

        ExtractionResult {
            diagnostics,
            unmatched,
            snippet_stats,
            by_file,
            by_category,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
