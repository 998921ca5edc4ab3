// SPDX-License-Identifier: MIT

//! Single-writer enforcement for a `.detent` store (spec.md §4.9): a second
//! writer must abort with `kind=Locked` rather than corrupt the first
//! writer's in-flight append.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

const LOCK_FILE_NAME: &str = "LOCK";

/// Held for the lifetime of a [`crate::Store`]. Dropping it removes the
/// lock file, so an aborted process (not a panic-unwind, a hard crash)
/// is the only way a stale lock survives; callers recovering from that
/// should remove the file by hand once they've confirmed no other writer
/// is actually running.
pub struct AdvisoryLock {
    path: PathBuf,
}

impl AdvisoryLock {
    pub fn acquire(store_root: &Path) -> Result<Self, StorageError> {
        let path = store_root.join(LOCK_FILE_NAME);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::AlreadyExists {
                    StorageError::Locked(path.display().to_string())
                } else {
                    StorageError::Io {
                        path: path.display().to_string(),
                        source,
                    }
                }
            })?;

        let _ = write!(file, "{}", std::process::id());

        Ok(Self { path })
    }
}

impl Drop for AdvisoryLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove advisory lock file");
        }
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
