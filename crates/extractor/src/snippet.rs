// SPDX-License-Identifier: MIT

//! Post-processing step 2 (spec.md §4.8): best-effort `±3`-line source
//! snippets. Reading the checkout is never allowed to fail the extraction;
//! every attempt is counted instead.

use std::path::Path;

const CONTEXT_LINES: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnippetStats {
    pub attached: u32,
    pub failed: u32,
}

#[derive(Debug, thiserror::Error)]
enum SnippetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn read_snippet(checkout_root: &Path, file: &str, line: u32) -> Result<String, SnippetError> {
    let path = checkout_root.join(file);
    let contents = std::fs::read_to_string(&path).map_err(|source| SnippetError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let lines: Vec<&str> = contents.lines().collect();
    let center = line.saturating_sub(1) as usize;
    let start = center.saturating_sub(CONTEXT_LINES as usize);
    let end = (center + CONTEXT_LINES as usize + 1).min(lines.len());
    if start >= lines.len() {
        return Ok(String::new());
    }
    Ok(lines[start..end].join("\n"))
}

/// Attaches a snippet to every diagnostic that has both `file` and `line`,
/// resolving `file` against `checkout_root`. Returns counts of how many
/// attempts succeeded or failed, for the extraction record's telemetry.
pub fn attach_snippets(
    diagnostics: &mut [detent_core::Diagnostic],
    checkout_root: &Path,
) -> SnippetStats {
    let mut stats = SnippetStats::default();
    for diag in diagnostics.iter_mut() {
        let (file, line) = match (&diag.file, diag.line) {
            (Some(file), Some(line)) => (file.clone(), line),
            _ => continue,
        };
        match read_snippet(checkout_root, &file, line) {
            Ok(snippet) if !snippet.is_empty() => {
                diag.snippet = Some(snippet);
                stats.attached += 1;
            }
            Ok(_) => {
                stats.failed += 1;
            }
            Err(e) => {
                tracing::debug!(error = %e, "could not attach source snippet");
                stats.failed += 1;
            }
        }
    }
    stats
}

#[cfg(test)]
#[path = "snippet_tests.rs"]
mod tests;
