// SPDX-License-Identifier: MIT

//! Derives a human-readable, shell-safe display name for a step, used both in
//! the manifest's `steps` array and in the injected `step-start` marker.

use crate::model::Step;

const MAX_LEN: usize = 40;

/// Picks the first available of `name`, `id`, shortened `uses`, or the first line
/// of `run` (capped at 40 chars), then sanitizes the result for embedding inside a
/// single-quoted shell string.
pub fn display_name_for_step(step: &Step) -> String {
    let raw = if let Some(ref name) = step.name {
        name.clone()
    } else if let Some(ref id) = step.id {
        id.clone()
    } else if let Some(ref uses) = step.uses {
        shorten_uses(uses)
    } else if let Some(ref run) = step.run {
        first_line(run)
    } else {
        String::new()
    };
    sanitize_for_single_quotes(&truncate(&raw, MAX_LEN))
}

fn shorten_uses(uses: &str) -> String {
    // `owner/repo@ref` -> `repo@ref`; leave local/docker refs alone.
    match uses.rsplit_once('/') {
        Some((_, rest)) if !uses.starts_with("./") && !uses.starts_with("docker://") => {
            rest.to_string()
        }
        _ => uses.to_string(),
    }
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or("").to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Strips NULs, collapses CR/LF/TAB to a single space, and escapes `'` for safe
/// embedding inside a single-quoted shell string (`'` -> `'\''`).
pub fn sanitize_for_single_quotes(s: &str) -> String {
    let mut cleaned = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\0' => {}
            '\r' | '\n' | '\t' => cleaned.push(' '),
            other => cleaned.push(other),
        }
    }
    cleaned.replace('\'', r"'\''")
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
