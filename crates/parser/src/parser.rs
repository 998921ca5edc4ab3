// SPDX-License-Identifier: MIT

//! Stateful, single-threaded line parser (spec.md §4.7).

use detent_core::JobId;

use crate::ansi::strip_ansi;
use crate::event::{Event, JobStatus};
use crate::manifest::decode_manifest;
use crate::patterns::{
    job_end_pattern, job_start_pattern, manifest_pattern, step_start_pattern, MARKER_PREFIX,
    MAX_STEP_INDEX,
};

/// Parses the driver's line stream into [`Event`]s.
///
/// One instance per run: it remembers whether a manifest has already been
/// accepted, since the first valid manifest wins and later ones are ignored
/// (spec.md §4.7).
#[derive(Debug, Default)]
pub struct EventParser {
    manifest_accepted: bool,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one line, returning `Some(event)` if it was a recognized,
    /// well-formed marker, `None` otherwise (including for non-marker runner
    /// output, which is the overwhelming majority of lines).
    pub fn feed_line(&mut self, raw_line: &str) -> Option<Event> {
        if !raw_line.contains(MARKER_PREFIX) {
            return None;
        }
        let line = strip_ansi(raw_line);
        let line = line.trim_end();

        if let Some(caps) = manifest_pattern().captures(line) {
            if self.manifest_accepted {
                return None;
            }
            let manifest = decode_manifest(&caps["b64"])?;
            self.manifest_accepted = true;
            return Some(Event::Manifest(manifest));
        }

        if let Some(caps) = job_start_pattern().captures(line) {
            let job_id = JobId::new(&caps["job_id"]);
            if !job_id.is_valid() {
                return None;
            }
            return Some(Event::JobStart { job_id });
        }

        if let Some(caps) = job_end_pattern().captures(line) {
            let job_id = JobId::new(&caps["job_id"]);
            if !job_id.is_valid() {
                return None;
            }
            let status = JobStatus::parse(&caps["status"])?;
            return Some(Event::JobEnd { job_id, status });
        }

        if let Some(caps) = step_start_pattern().captures(line) {
            let job_id = JobId::new(&caps["job_id"]);
            if !job_id.is_valid() {
                return None;
            }
            let index: u32 = caps["idx"].parse().ok()?;
            if index > MAX_STEP_INDEX {
                return None;
            }
            return Some(Event::StepStart {
                job_id,
                index,
                name: caps["name"].to_string(),
            });
        }

        None
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
