// SPDX-License-Identifier: MIT

//! ANSI escape stripping, applied before marker patterns run (spec.md §4.7).
//! Runner output is frequently colorized by the tool it wraps, and a marker
//! line can land mid-color-run if the tool doesn't reset before its own echo.

use std::sync::OnceLock;

fn ansi_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("ansi pattern is valid regex")
    })
}

/// Removes CSI-style ANSI escape sequences. Leaves the line untouched (and
/// allocation-free) when it contains none.
pub fn strip_ansi(line: &str) -> std::borrow::Cow<'_, str> {
    if !line.as_bytes().contains(&0x1b) {
        return std::borrow::Cow::Borrowed(line);
    }
    ansi_pattern().replace_all(line, "")
}

#[cfg(test)]
#[path = "ansi_tests.rs"]
mod tests;
