// SPDX-License-Identifier: MIT

//! Anchored marker patterns (spec.md §4.7). The literal prefix check in
//! [`crate::parser::EventParser::feed_line`] is the real fast path; these
//! regexes only run once a line has already proven interesting.

use std::sync::OnceLock;

use regex::Regex;

pub const MARKER_PREFIX: &str = "::detent::";

/// Maximum `idx` accepted in a `step-start` marker (spec.md §4.7).
pub const MAX_STEP_INDEX: u32 = 10_000;

fn compiled(pattern: &'static str, slot: &'static OnceLock<Regex>) -> &'static Regex {
    slot.get_or_init(|| Regex::new(pattern).expect("marker pattern is valid regex"))
}

pub fn manifest_pattern() -> &'static Regex {
    static SLOT: OnceLock<Regex> = OnceLock::new();
    compiled(r"^::detent::manifest::v2::b64::(?P<b64>[A-Za-z0-9+/=]+)$", &SLOT)
}

pub fn job_start_pattern() -> &'static Regex {
    static SLOT: OnceLock<Regex> = OnceLock::new();
    compiled(r"^::detent::job-start::(?P<job_id>[^:]+)$", &SLOT)
}

pub fn job_end_pattern() -> &'static Regex {
    static SLOT: OnceLock<Regex> = OnceLock::new();
    compiled(
        r"^::detent::job-end::(?P<job_id>[^:]+)::(?P<status>success|failure|cancelled)$",
        &SLOT,
    )
}

pub fn step_start_pattern() -> &'static Regex {
    static SLOT: OnceLock<Regex> = OnceLock::new();
    compiled(
        r"^::detent::step-start::(?P<job_id>[^:]+)::(?P<idx>[0-9]+)::(?P<name>.*)$",
        &SLOT,
    )
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;
