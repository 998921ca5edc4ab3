// SPDX-License-Identifier: MIT

//! Unmatched-line telemetry (spec.md §4.8): lines that no registered parser
//! claimed, but that look like they were trying to report something, so
//! silently dropping them would hide real signal.

use std::sync::OnceLock;

use detent_core::{Diagnostic, Severity};
use regex::Regex;

fn error_like_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(error|warning)\b").expect("telemetry pattern is valid regex")
    })
}

pub fn looks_error_like(line: &str) -> bool {
    error_like_pattern().is_match(line)
}

/// Counts of lines that matched no registered parser, split between ones
/// that looked relevant and everything else (ordinary chatter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnmatchedTelemetry {
    pub error_like: u32,
    pub other: u32,
}

impl UnmatchedTelemetry {
    pub fn record(&mut self, line: &str) {
        if looks_error_like(line) {
            self.error_like += 1;
        } else {
            self.other += 1;
        }
    }
}

/// Builds the low-confidence diagnostic recorded for an unmatched,
/// error-like line: `category=unknown`, so consumers can tell it apart from
/// anything a real parser produced.
pub fn unknown_diagnostic(line: &str) -> Diagnostic {
    Diagnostic::new(Severity::Warning, "unknown", line.trim())
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
