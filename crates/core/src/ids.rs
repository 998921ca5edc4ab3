// SPDX-License-Identifier: MIT

//! Concrete identifier newtypes shared across the `detent-*` crates.

use std::sync::OnceLock;

use crate::define_id;

define_id! {
    /// A run's content-derived identifier: 16 lowercase hex characters.
    pub struct RunId;
}

define_id! {
    /// A workflow job id, as it appears as a YAML mapping key.
    ///
    /// Must match `^[A-Za-z_][A-Za-z0-9_-]*$` to be eligible for marker injection;
    /// jobs whose id fails the pattern are represented with this same type but are
    /// filtered out of the manifest and left structurally untouched by the transformer.
    pub struct JobId;
}

fn job_id_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("job id pattern is valid regex")
    })
}

impl JobId {
    /// Whether this id is safe for shell-embedded marker injection.
    pub fn is_valid(&self) -> bool {
        job_id_pattern().is_match(self.as_str())
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
