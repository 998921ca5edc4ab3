// SPDX-License-Identifier: MIT

//! Steps 4–6 of the rewrite pipeline (spec.md §4.5): continue-on-failure
//! injection, dependency unblocking, and timeout clamping.

use detent_core::Config;

use crate::model::Job;

/// Step 4: every non-sensitive, non-reusable job gets `continueOnError = true`.
/// This overrides any prior value (including an unparsed expression), so a
/// raw value left in `extra` from parsing is cleared to keep it from
/// clobbering the forced `true` on serialization.
pub fn apply_continue_on_error(job: &mut Job, sensitive: bool) {
    if sensitive || job.uses.is_some() {
        return;
    }
    job.continue_on_error = Some(true);
    job.clear_raw_continue_on_error();
}

/// Step 5: a non-sensitive job with `needs` gets `if: "always()"`, preserving
/// any prior `if` as `"always() && (<prior>)"`.
pub fn apply_dependency_unblock(job: &mut Job, sensitive: bool) {
    if sensitive || job.needs.is_none() {
        return;
    }
    job.if_expr = Some(match job.if_expr.take() {
        Some(prior) => format!("always() && ({prior})"),
        None => "always()".to_string(),
    });
}

/// Step 3 override: a sensitive job is rewritten to never execute.
pub fn apply_sensitive_skip(job: &mut Job) {
    job.if_expr = Some("false".to_string());
}

/// Step 6: inject default timeouts where none were declared. Existing values
/// are preserved untouched — including a declared-but-unparseable value
/// (e.g. an expression), which counts as "declared" and must not be
/// clobbered by a default.
pub fn apply_timeout_defaults(job: &mut Job, config: &Config) {
    if job.uses.is_some() {
        return;
    }
    if job.timeout_minutes.is_none() && !job.has_raw_timeout_minutes() {
        job.timeout_minutes = Some(config.default_job_timeout_minutes);
    }
    for step in &mut job.steps {
        if step.timeout_minutes.is_none() && !step.has_raw_timeout_minutes() {
            step.timeout_minutes = Some(config.default_step_timeout_minutes);
        }
    }
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
