// SPDX-License-Identifier: MIT

//! The normalized diagnostic shape produced by the extractor and persisted by storage.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Severity of a single diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single normalized error/warning extracted from runner output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Short tag naming the producing tool or class, e.g. `go-build`, `eslint`.
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "ruleId")]
    pub rule_id: Option<String>,
    /// The producing tool, if known separately from `category`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub message: String,
    /// Stable fingerprint over `(category, file, line, ruleId, message)`, used for
    /// deduplication across runs. Always populated; see [`Diagnostic::compute_content_hash`].
    #[serde(rename = "contentHash")]
    pub content_hash: String,
    /// A snippet of `±3` lines of source around `file:line`, when readable.
    /// Not part of the dedup key; purely presentational.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Diagnostic {
    /// Builds a diagnostic and fills in its content hash. `content_hash` on the input
    /// is ignored; callers should not set it by hand.
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let category = category.into();
        let message = message.into();
        let mut diag = Self {
            severity,
            category,
            file: None,
            line: None,
            column: None,
            rule_id: None,
            source: None,
            content_hash: String::new(),
            message,
            snippet: None,
        };
        diag.content_hash = diag.compute_content_hash();
        diag
    }

    pub fn with_location(
        mut self,
        file: impl Into<String>,
        line: Option<u32>,
        column: Option<u32>,
    ) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self.column = column;
        self.content_hash = self.compute_content_hash();
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self.content_hash = self.compute_content_hash();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// `sha256(category | file | line | ruleId | message)`, hex-encoded.
    /// Deliberately excludes `source` and `column`: two tools reporting the same
    /// underlying error at a slightly different column should still dedup.
    pub fn compute_content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.category.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.file.as_deref().unwrap_or("").as_bytes());
        hasher.update(b"\0");
        if let Some(line) = self.line {
            hasher.update(line.to_string().as_bytes());
        }
        hasher.update(b"\0");
        hasher.update(self.rule_id.as_deref().unwrap_or("").as_bytes());
        hasher.update(b"\0");
        hasher.update(self.message.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
#[path = "diagnostic_tests.rs"]
mod tests;
