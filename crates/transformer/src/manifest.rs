// SPDX-License-Identifier: MIT

//! The manifest: the external, bit-exact wire contract between the transformer
//! and the event parser (spec.md §3, §4.5 step 7, §6).

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Current manifest schema version. Bump whenever the marker wire format changes.
pub const MANIFEST_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestJob {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    pub sensitive: bool,
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub v: u32,
    pub jobs: Vec<ManifestJob>,
    /// Not part of the wire contract's equality/hash surface (see SPEC_FULL.md §C.5);
    /// present only for debugging transform determinism across runs.
    #[serde(rename = "generatedAt", skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<i64>,
}

impl Manifest {
    pub fn new(mut jobs: Vec<ManifestJob>) -> Self {
        jobs.sort_by(|a, b| a.id.as_bytes().cmp(b.id.as_bytes()));
        Self {
            v: MANIFEST_VERSION,
            jobs,
            generated_at: None,
        }
    }

    pub fn with_generated_at(mut self, epoch_ms: i64) -> Self {
        self.generated_at = Some(epoch_ms);
        self
    }

    /// The fields compared for the bit-exactness/determinism invariant: `v` and
    /// `jobs`, deliberately excluding `generatedAt`.
    pub fn stable_key(&self) -> (u32, &[ManifestJob]) {
        (self.v, &self.jobs)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_base64(&self) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        Ok(base64::engine::general_purpose::STANDARD.encode(json))
    }

    /// Decodes a manifest from a base64 marker payload. Returns `None` (rather
    /// than an error) on any malformed input per spec.md §4.7: a bad manifest
    /// marker is discarded, not fatal.
    pub fn from_base64(encoded: &str) -> Option<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .ok()?;
        let json = String::from_utf8(bytes).ok()?;
        let manifest: Manifest = serde_json::from_str(&json).ok()?;
        if manifest.v != MANIFEST_VERSION {
            return None;
        }
        Some(manifest)
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
