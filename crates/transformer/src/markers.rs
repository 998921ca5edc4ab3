// SPDX-License-Identifier: MIT

//! Step 7 of the rewrite pipeline (spec.md §4.5): marker-step injection.
//!
//! Marker lines are a compatibility surface shared with `detent-parser`
//! (spec.md §4.7, §6) and must not change without a manifest `v`-bump.

use serde_yaml::Mapping;

use crate::model::Step;
use crate::sanitize::{display_name_for_step, sanitize_for_single_quotes};

fn echo_step(line: String) -> Step {
    Step {
        name: None,
        id: None,
        run: Some(format!("echo '{line}'")),
        uses: None,
        timeout_minutes: None,
        if_expr: None,
        extra: Mapping::new(),
    }
}

pub fn job_start_marker(job_id: &str) -> Step {
    echo_step(format!("::detent::job-start::{job_id}"))
}

pub fn step_start_marker(job_id: &str, index: usize, step: &Step) -> Step {
    let name = display_name_for_step(step);
    echo_step(format!("::detent::step-start::{job_id}::{index}::{name}"))
}

pub fn job_end_marker(job_id: &str) -> Step {
    let mut step = echo_step(format!(
        "::detent::job-end::{job_id}::${{{{ job.status }}}}"
    ));
    step.if_expr = Some("always()".to_string());
    step
}

pub fn manifest_marker(base64: &str) -> Step {
    // Defensive: a manifest line is constructed by us from a base64 alphabet
    // (`A-Za-z0-9+/=`), so there is nothing to sanitize, but route through the
    // same helper as every other marker to keep the invariant in one place.
    echo_step(format!(
        "::detent::manifest::v2::b64::{}",
        sanitize_for_single_quotes(base64)
    ))
}

/// Rewrites `original_steps` into the marker-wrapped sequence:
/// `[manifest?, job-start, (step-start, orig)*, job-end]`.
pub fn wrap_steps(job_id: &str, original_steps: Vec<Step>, manifest_b64: Option<&str>) -> Vec<Step> {
    let mut out = Vec::with_capacity(original_steps.len() * 2 + 2 + manifest_b64.is_some() as usize);
    if let Some(b64) = manifest_b64 {
        out.push(manifest_marker(b64));
    }
    out.push(job_start_marker(job_id));
    for (idx, step) in original_steps.iter().enumerate() {
        out.push(step_start_marker(job_id, idx, step));
        out.push(step.clone());
    }
    out.push(job_end_marker(job_id));
    out
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
