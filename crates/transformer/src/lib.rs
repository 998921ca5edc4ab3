// SPDX-License-Identifier: MIT

//! Deterministic YAML rewriter: parses third-party GitHub Actions workflows,
//! rewrites them to be safe and observable when executed locally, and builds
//! the manifest the event parser consumes (spec.md §4.5).

pub mod error;
pub mod manifest;
pub mod markers;
pub mod model;
pub mod rewrite;
pub mod sanitize;
pub mod sensitivity;
pub mod serialize;
pub mod validate;

use detent_core::{Config, JobId};

pub use error::TransformError;
pub use manifest::{Manifest, ManifestJob};
pub use model::{Job, Needs, Step, WorkflowDocument};

/// One workflow file as handed to the transformer.
#[derive(Debug, Clone)]
pub struct TransformInput {
    /// File name relative to the workflow directory, used as both the
    /// manifest's `workflowName` attribution and the sensitivity-by-filename
    /// signal (spec.md §4.5 step 3).
    pub relative_name: String,
    pub source: String,
}

/// One rewritten workflow file, ready to be written under the transformer's
/// temp directory.
#[derive(Debug, Clone)]
pub struct RewrittenFile {
    pub relative_name: String,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub files: Vec<RewrittenFile>,
    pub manifest: Manifest,
    pub warnings: Vec<String>,
}

pub struct Transformer<'a> {
    config: &'a Config,
}

impl<'a> Transformer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Runs the full rewrite pipeline (spec.md §4.5 steps 1–7) over every
    /// input file and returns the rewritten documents plus the manifest.
    /// Serialization (step 8) is a separate call (`serialize::write_rewritten`)
    /// so callers control where the temp directory lives.
    pub fn transform(
        &self,
        inputs: &[TransformInput],
        repo_first_commit: &str,
    ) -> Result<TransformOutput, TransformError> {
        let mut docs = Vec::with_capacity(inputs.len());
        for input in inputs {
            let path = std::path::PathBuf::from(&input.relative_name);
            let doc = WorkflowDocument::parse(&path, &input.source)?;
            docs.push((input.relative_name.clone(), doc));
        }

        let mut warnings = Vec::new();
        for (name, doc) in &docs {
            let path = std::path::Path::new(name);
            for (id, job) in &doc.jobs {
                validate::validate_job(path, id, job)?;
                warnings.extend(validate::collect_warnings(path, id, job));
            }
        }

        // First pass: apply sensitivity/continue-on-error/dependency/timeout
        // rewrites and collect manifest entries, before marker injection (the
        // manifest step needs the manifest's own bytes, which aren't known
        // until every job has been classified). Also records each eligible
        // job's (sensitive, reusable, has_needs) so the manifest-carrier pick
        // below can exclude jobs that would never actually run the step.
        let mut manifest_jobs = Vec::new();
        let mut carrier_candidates: Vec<(String, bool)> = Vec::new(); // (id, has_needs)
        for (name, doc) in &mut docs {
            let file_stem = std::path::Path::new(name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(name)
                .to_string();
            for (id, job) in doc.jobs.iter_mut() {
                if !JobId::new(id.clone()).is_valid() {
                    continue;
                }
                let display_name = job.name.clone().unwrap_or_else(|| id.clone());
                let name_checks = [id.as_str(), display_name.as_str()];
                let sensitive = sensitivity::is_sensitive(
                    self.config,
                    repo_first_commit,
                    &file_stem,
                    id,
                    job,
                    &name_checks,
                );

                if sensitive {
                    rewrite::apply_sensitive_skip(job);
                }
                rewrite::apply_continue_on_error(job, sensitive);
                rewrite::apply_dependency_unblock(job, sensitive);
                rewrite::apply_timeout_defaults(job, self.config);

                if !sensitive && job.uses.is_none() {
                    carrier_candidates.push((id.clone(), job.needs.is_some()));
                }

                let steps: Vec<String> = job
                    .steps
                    .iter()
                    .map(sanitize::display_name_for_step)
                    .collect();

                manifest_jobs.push(ManifestJob {
                    id: id.clone(),
                    name: display_name,
                    uses: job.uses.clone(),
                    sensitive,
                    steps,
                    needs: job.needs.as_ref().map(Needs::as_vec),
                });
            }
        }

        // Step 7's last bullet: the single carrier must actually execute the
        // injected manifest step, so reusable and sensitive jobs (skipped via
        // `if: false`) are excluded before picking the first byte-sorted,
        // needs-free candidate.
        carrier_candidates.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        let manifest_job_id = carrier_candidates
            .iter()
            .find(|(_, has_needs)| !has_needs)
            .map(|(id, _)| id.clone());

        let manifest = Manifest::new(manifest_jobs);
        let manifest_b64 = manifest
            .to_base64()
            .map_err(|e| error::TransformError::Io {
                file: std::path::PathBuf::from("<manifest>"),
                source: std::io::Error::other(e),
            })?;

        // Second pass: inject markers now that the manifest payload is known.
        for (_, doc) in &mut docs {
            for (id, job) in doc.jobs.iter_mut() {
                if !JobId::new(id.clone()).is_valid() || job.uses.is_some() {
                    continue;
                }
                let carries_manifest = manifest_job_id.as_deref() == Some(id.as_str());
                let original = std::mem::take(&mut job.steps);
                job.steps = markers::wrap_steps(
                    id,
                    original,
                    carries_manifest.then_some(manifest_b64.as_str()),
                );
            }
        }

        let files = docs
            .into_iter()
            .map(|(name, doc)| {
                doc.serialize()
                    .map(|contents| RewrittenFile {
                        relative_name: name.clone(),
                        contents,
                    })
                    .map_err(|source| TransformError::Yaml {
                        file: std::path::PathBuf::from(name),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransformOutput {
            files,
            manifest,
            warnings,
        })
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
