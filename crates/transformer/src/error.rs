// SPDX-License-Identifier: MIT

//! Errors raised while parsing, validating, or rewriting workflow files.

use std::path::PathBuf;

/// A parse/validation/rewrite failure, always attributable to one workflow file.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("{file}: invalid YAML: {source}")]
    Yaml {
        file: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{file}: top-level document must be a mapping")]
    NotAMapping { file: PathBuf },

    #[error("{file}: `jobs` must be a mapping")]
    JobsNotAMapping { file: PathBuf },

    #[error("{file}: job `{job}`: {reason}")]
    InvalidJob {
        file: PathBuf,
        job: String,
        reason: String,
    },

    #[error("{file}: job `{job}`: unsupported runner `{runs_on}`")]
    UnsupportedRunner {
        file: PathBuf,
        job: String,
        runs_on: String,
    },

    #[error("{file}: job `{job}`: reusable workflow jobs must not declare `steps`")]
    ReusableJobHasSteps { file: PathBuf, job: String },

    #[error("failed to write rewritten workflow {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransformError {
    pub fn file(&self) -> &std::path::Path {
        match self {
            TransformError::Yaml { file, .. }
            | TransformError::NotAMapping { file }
            | TransformError::JobsNotAMapping { file }
            | TransformError::InvalidJob { file, .. }
            | TransformError::UnsupportedRunner { file, .. }
            | TransformError::ReusableJobHasSteps { file, .. }
            | TransformError::Io { file, .. } => file,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
