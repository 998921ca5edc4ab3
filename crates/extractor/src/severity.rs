// SPDX-License-Identifier: MIT

//! Post-processing step 1 (spec.md §4.8): per-category severity overrides,
//! e.g. a linter rule that's conventionally a style nit gets demoted to
//! `warning` even when the tool reports it at `error` level.

use detent_core::{Diagnostic, Severity};

#[derive(Debug, Clone)]
pub struct SeverityRule {
    pub category: String,
    /// When `Some`, only diagnostics whose `ruleId` equals this are demoted;
    /// when `None`, the whole category is affected.
    pub rule_id: Option<String>,
    pub severity: Severity,
}

impl SeverityRule {
    pub fn for_category(category: impl Into<String>, severity: Severity) -> Self {
        Self {
            category: category.into(),
            rule_id: None,
            severity,
        }
    }

    pub fn for_rule(
        category: impl Into<String>,
        rule_id: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            category: category.into(),
            rule_id: Some(rule_id.into()),
            severity,
        }
    }

    fn matches(&self, diag: &Diagnostic) -> bool {
        if diag.category != self.category {
            return false;
        }
        match &self.rule_id {
            Some(rule_id) => diag.rule_id.as_deref() == Some(rule_id.as_str()),
            None => true,
        }
    }
}

/// Applies `rules` in order; the last matching rule for a diagnostic wins,
/// matching how later, more specific config typically overrides earlier,
/// broader config.
pub fn apply_severity_rules(diagnostics: &mut [Diagnostic], rules: &[SeverityRule]) {
    for diag in diagnostics.iter_mut() {
        for rule in rules {
            if rule.matches(diag) {
                diag.severity = rule.severity;
            }
        }
    }
}

#[cfg(test)]
#[path = "severity_tests.rs"]
mod tests;
