// SPDX-License-Identifier: MIT

//! Step 1 of the rewrite pipeline (spec.md §4.5): reject what the local runner
//! cannot host, and surface non-fatal warnings.

use std::path::Path;

use serde_yaml::Value;

use crate::error::TransformError;
use crate::model::Job;

const UNSUPPORTED_RUNNER_SUBSTRINGS: &[&str] = &["windows", "macos", "mac-os"];

fn runs_on_labels(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Sequence(seq) => seq.iter().filter_map(|v| v.as_str()).map(str::to_string).collect(),
        Value::Mapping(m) => m
            .values()
            .flat_map(runs_on_labels)
            .collect(),
        _ => Vec::new(),
    }
}

fn is_unsupported_runner(value: &Value) -> Option<String> {
    for label in runs_on_labels(value) {
        let lower = label.to_ascii_lowercase();
        if UNSUPPORTED_RUNNER_SUBSTRINGS
            .iter()
            .any(|pat| lower.contains(pat))
        {
            return Some(label);
        }
    }
    None
}

/// Validates a single job, returning a fatal error if the local runner cannot
/// host it. `file` is used only to attribute the error.
pub fn validate_job(file: &Path, id: &str, job: &Job) -> Result<(), TransformError> {
    if job.uses.is_some() {
        if !job.steps.is_empty() {
            return Err(TransformError::ReusableJobHasSteps {
                file: file.to_path_buf(),
                job: id.to_string(),
            });
        }
        return Ok(());
    }

    if let Some(ref runs_on) = job.runs_on {
        if let Some(bad) = is_unsupported_runner(runs_on) {
            return Err(TransformError::UnsupportedRunner {
                file: file.to_path_buf(),
                job: id.to_string(),
                runs_on: bad,
            });
        }
    }

    Ok(())
}

/// Non-fatal warnings: spec.md §4.5 step 1 asks only for a service-container
/// warning; this is the sole check here today but returns a `Vec` so future
/// warning classes don't need a signature change.
pub fn collect_warnings(file: &Path, id: &str, job: &Job) -> Vec<String> {
    let mut warnings = Vec::new();
    if job.extra.contains_key(&Value::String("services".to_string())) {
        warnings.push(format!(
            "{}: job `{id}` declares service containers, which the local runner does not manage",
            file.display()
        ));
    }
    warnings
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
