// SPDX-License-Identifier: MIT

//! Step 8 of the rewrite pipeline (spec.md §4.5): writes rewritten documents
//! into a temporary directory at file mode 0600.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::TransformError;

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Writes `relative_name` + `contents` under `dir`, creating parent
/// directories as needed, at mode 0600 on Unix hosts.
pub fn write_rewritten(dir: &Path, relative_name: &str, contents: &str) -> Result<PathBuf, TransformError> {
    let dest = dir.join(relative_name);
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|source| TransformError::Io {
            file: dest.clone(),
            source,
        })?;
    }
    let mut file = open_private(&dest).map_err(|source| TransformError::Io {
        file: dest.clone(),
        source,
    })?;
    file.write_all(contents.as_bytes())
        .map_err(|source| TransformError::Io {
            file: dest.clone(),
            source,
        })?;
    Ok(dest)
}

#[cfg(test)]
#[path = "serialize_tests.rs"]
mod tests;
