// SPDX-License-Identifier: MIT

//! Decoding of the `::detent::manifest::v2::b64::<base64>` marker payload.
//!
//! This is a deliberately independent read of the wire format described in
//! spec.md §4.5/§4.7/§6: the parser only ever needs to validate shape, not
//! reconstruct the transformer's in-memory model, so it decodes its own
//! minimal view rather than depending on `detent-transformer`.

use serde::Deserialize;

pub const MANIFEST_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestJobEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub uses: Option<String>,
    pub sensitive: bool,
    pub steps: Vec<String>,
    #[serde(default)]
    pub needs: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsedManifest {
    pub v: u32,
    pub jobs: Vec<ManifestJobEntry>,
    #[serde(rename = "generatedAt", default)]
    pub generated_at: Option<i64>,
}

/// Decodes and validates a manifest payload. Returns `None` for anything
/// that isn't valid base64, valid JSON, `v == 2`, or a well-formed job array
/// (spec.md §4.7) rather than erroring: a malformed manifest marker is
/// treated the same as a markup the parser doesn't recognize.
pub fn decode_manifest(b64: &str) -> Option<ParsedManifest> {
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.as_bytes())
        .ok()?;
    let manifest: ParsedManifest = serde_json::from_slice(&bytes).ok()?;
    if manifest.v != MANIFEST_VERSION {
        return None;
    }
    Some(manifest)
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
