// SPDX-License-Identifier: MIT

//! Step 3 of the rewrite pipeline (spec.md §4.5): classifies jobs as sensitive.

use detent_core::Config;

use crate::model::Job;

/// Actions known to perform side effects unsafe to run against a throwaway
/// local checkout: publishing releases, pushing images, or assuming cloud
/// credentials. Matched as a prefix of the `uses:` reference, ignoring the
/// trailing `@ref`.
const DANGEROUS_ACTIONS: &[&str] = &[
    "softprops/action-gh-release",
    "actions/create-release",
    "pypa/gh-action-pypi-publish",
    "docker/login-action",
    "docker/build-push-action",
    "aws-actions/configure-aws-credentials",
    "azure/login",
    "google-github-actions/auth",
    "peaceiris/actions-gh-pages",
    "JamesIves/github-pages-deploy-action",
];

fn action_name(uses: &str) -> &str {
    uses.split('@').next().unwrap_or(uses)
}

fn uses_dangerous_action(job: &Job) -> bool {
    job.steps.iter().any(|step| {
        step.uses
            .as_deref()
            .map(action_name)
            .is_some_and(|name| DANGEROUS_ACTIONS.iter().any(|d| name.eq_ignore_ascii_case(d)))
    })
}

/// Whether `job` is sensitive, per spec.md §4.5 step 3: name/file match OR a
/// known-dangerous step, unless the user has explicitly allow-listed it for
/// this repository (scoped by first commit SHA).
pub fn is_sensitive(
    config: &Config,
    repo_first_commit: &str,
    workflow_file_stem: &str,
    job_id: &str,
    job: &Job,
    config_name_checks: &[&str],
) -> bool {
    if config.is_job_allowed(repo_first_commit, job_id) {
        return false;
    }

    let name_match = config.matches_sensitive_pattern(workflow_file_stem)
        || config_name_checks
            .iter()
            .any(|n| config.matches_sensitive_pattern(n));

    name_match || uses_dangerous_action(job)
}

#[cfg(test)]
#[path = "sensitivity_tests.rs"]
mod tests;
