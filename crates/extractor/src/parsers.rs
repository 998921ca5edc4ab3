// SPDX-License-Identifier: MIT

//! Built-in line parsers (spec.md §4.8). Each one answers "does this line
//! belong to me," and if so, what diagnostics it carries; a parser that
//! doesn't recognize the line returns `None` rather than an empty match so
//! the registry can tell "matched, nothing to report" apart from "not mine."

use std::sync::OnceLock;

use detent_core::{Diagnostic, Severity};
use regex::Regex;

/// Implemented by every tool-specific (or generic) line recognizer in the
/// registry. Parsers never fail: an unparseable line is simply not theirs.
pub trait LineParser: Send + Sync {
    fn name(&self) -> &'static str;
    fn parse_line(&self, line: &str) -> Option<Vec<Diagnostic>>;
}

fn compiled(pattern: &'static str, slot: &'static OnceLock<Regex>) -> &'static Regex {
    slot.get_or_init(|| Regex::new(pattern).expect("built-in diagnostic pattern is valid regex"))
}

/// `path:line:col: error: message` / `path:line:col: warning: message`,
/// the shape emitted by most compilers and linters (rustc, eslint --format
/// unix, clang).
pub struct SeverityPrefixedParser;

impl LineParser for SeverityPrefixedParser {
    fn name(&self) -> &'static str {
        "severity-prefixed"
    }

    fn parse_line(&self, line: &str) -> Option<Vec<Diagnostic>> {
        static SLOT: OnceLock<Regex> = OnceLock::new();
        let pattern = compiled(
            r"^(?P<file>[^\s:][^:]*):(?P<line>\d+):(?P<col>\d+):\s*(?P<severity>error|warning)\s*:?\s*(?P<message>.+)$",
            &SLOT,
        );
        let caps = pattern.captures(line)?;
        let severity = match &caps["severity"] {
            "error" => Severity::Error,
            _ => Severity::Warning,
        };
        let diag = Diagnostic::new(severity, "compiler", caps["message"].trim())
            .with_location(
                &caps["file"],
                caps["line"].parse().ok(),
                caps["col"].parse().ok(),
            );
        Some(vec![diag])
    }
}

/// One JSON object per line, the shape used by `--format json`-style tool
/// output. Requires at minimum `message`; `file`/`line`/`column`/`severity`/
/// `ruleId` are read when present.
pub struct JsonDiagnosticParser;

impl LineParser for JsonDiagnosticParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse_line(&self, line: &str) -> Option<Vec<Diagnostic>> {
        let trimmed = line.trim();
        if !trimmed.starts_with('{') {
            return None;
        }
        let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
        let message = value.get("message")?.as_str()?;

        let severity = match value.get("severity").and_then(|s| s.as_str()) {
            Some("warning") => Severity::Warning,
            Some("info") => Severity::Info,
            _ => Severity::Error,
        };
        let category = value
            .get("category")
            .and_then(|c| c.as_str())
            .unwrap_or("json")
            .to_string();

        let mut diag = Diagnostic::new(severity, category, message);
        if let Some(file) = value.get("file").and_then(|f| f.as_str()) {
            let line_no = value.get("line").and_then(|l| l.as_u64()).map(|n| n as u32);
            let col_no = value
                .get("column")
                .and_then(|c| c.as_u64())
                .map(|n| n as u32);
            diag = diag.with_location(file, line_no, col_no);
        }
        if let Some(rule_id) = value.get("ruleId").and_then(|r| r.as_str()) {
            diag = diag.with_rule_id(rule_id);
        }
        Some(vec![diag])
    }
}

/// A bare `path:line:col: message` with no severity keyword. Treated as an
/// error by default: tools that use this shape (grep -n-style output,
/// some linters) reserve it for failures.
pub struct GenericPathLineColParser;

impl LineParser for GenericPathLineColParser {
    fn name(&self) -> &'static str {
        "generic-path-line-col"
    }

    fn parse_line(&self, line: &str) -> Option<Vec<Diagnostic>> {
        static SLOT: OnceLock<Regex> = OnceLock::new();
        let pattern = compiled(
            r"^(?P<file>[^\s:][^:]*):(?P<line>\d+):(?P<col>\d+):\s*(?P<message>.+)$",
            &SLOT,
        );
        let caps = pattern.captures(line)?;
        let diag = Diagnostic::new(Severity::Error, "generic", caps["message"].trim())
            .with_location(
                &caps["file"],
                caps["line"].parse().ok(),
                caps["col"].parse().ok(),
            );
        Some(vec![diag])
    }
}

/// Catches a tool announcing its own non-zero exit in prose, e.g. "Process
/// completed with exit code 1." Lowest-priority parser: it matches broad
/// phrasing, so more specific parsers get first refusal.
pub struct ExitCodeSentinelParser;

impl LineParser for ExitCodeSentinelParser {
    fn name(&self) -> &'static str {
        "exit-code-sentinel"
    }

    fn parse_line(&self, line: &str) -> Option<Vec<Diagnostic>> {
        static SLOT: OnceLock<Regex> = OnceLock::new();
        let pattern = compiled(r"(?i)exit code[:= ]+(?P<code>\d+)", &SLOT);
        let caps = pattern.captures(line)?;
        let code: u32 = caps["code"].parse().ok()?;
        if code == 0 {
            return Some(Vec::new());
        }
        let diag = Diagnostic::new(
            Severity::Error,
            "exit-code",
            format!("tool reported exit code {code}"),
        );
        Some(vec![diag])
    }
}

#[cfg(test)]
#[path = "parsers_tests.rs"]
mod tests;
