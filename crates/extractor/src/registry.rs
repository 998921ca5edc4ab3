// SPDX-License-Identifier: MIT

//! Ordered registry of [`LineParser`]s: the first match wins for a given
//! line (spec.md §4.8).

use detent_core::Diagnostic;

use crate::parsers::{
    ExitCodeSentinelParser, GenericPathLineColParser, JsonDiagnosticParser, LineParser,
    SeverityPrefixedParser,
};

pub struct ParserRegistry {
    parsers: Vec<Box<dyn LineParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    pub fn register(&mut self, parser: Box<dyn LineParser>) {
        self.parsers.push(parser);
    }

    /// The built-in parsers, in priority order: most structurally specific
    /// first, so the broad exit-code sentinel only catches what nothing else
    /// claimed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JsonDiagnosticParser));
        registry.register(Box::new(SeverityPrefixedParser));
        registry.register(Box::new(GenericPathLineColParser));
        registry.register(Box::new(ExitCodeSentinelParser));
        registry
    }

    /// Runs the registry against one line. `None` means no parser claimed
    /// it; callers use that to route the line to unmatched-line telemetry.
    pub fn parse_line(&self, line: &str) -> Option<Vec<Diagnostic>> {
        for parser in &self.parsers {
            if let Some(diags) = parser.parse_line(line) {
                return Some(diags);
            }
        }
        None
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
