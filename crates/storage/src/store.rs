// SPDX-License-Identifier: MIT

//! Append-only run persistence (spec.md §4.9).
//!
//! A `Store` owns a `.detent` directory: one immutable file per run under
//! `runs/`, one file per distinct diagnostic under `diagnostics/` (mutated
//! only to add a referencing run or flip `acknowledged`), and an advisory
//! `LOCK` file enforcing a single writer for the directory's lifetime.

use std::fs;
use std::path::{Path, PathBuf};

use detent_core::Diagnostic;

use crate::error::StorageError;
use crate::lock::AdvisoryLock;
use crate::record::{DiagnosticRecord, RunRecord};

const RUNS_DIR: &str = "runs";
const DIAGNOSTICS_DIR: &str = "diagnostics";

pub struct Store {
    root: PathBuf,
    _lock: AdvisoryLock,
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let bytes = fs::read(path).map_err(|e| io_err(path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
        path: path.display().to_string(),
        source,
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Corrupt {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, bytes).map_err(|e| io_err(path, e))
}

impl Store {
    /// Opens (creating if necessary) a `.detent` store rooted at `root`,
    /// acquiring the single-writer lock. `root` is expected to already be
    /// `repoRoot/.detent`; this constructor doesn't append that segment.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(root.join(RUNS_DIR)).map_err(|e| io_err(&root, e))?;
        fs::create_dir_all(root.join(DIAGNOSTICS_DIR)).map_err(|e| io_err(&root, e))?;
        let lock = AdvisoryLock::acquire(&root)?;
        Ok(Self { root, _lock: lock })
    }

    pub(crate) fn run_path(&self, run_id: &str) -> PathBuf {
        self.root.join(RUNS_DIR).join(format!("{run_id}.json"))
    }

    pub(crate) fn diagnostic_path(&self, content_hash: &str) -> PathBuf {
        self.root
            .join(DIAGNOSTICS_DIR)
            .join(format!("{content_hash}.json"))
    }

    pub(crate) fn write_diagnostic_record(
        &self,
        record: &DiagnosticRecord,
    ) -> Result<(), StorageError> {
        write_json(&self.diagnostic_path(&record.diagnostic.content_hash), record)
    }

    pub(crate) fn remove_run_file(&self, run_id: &str) -> Result<(), StorageError> {
        let path = self.run_path(run_id);
        fs::remove_file(&path).map_err(|e| io_err(&path, e))
    }

    pub(crate) fn remove_diagnostic_file(&self, content_hash: &str) -> Result<(), StorageError> {
        let path = self.diagnostic_path(content_hash);
        fs::remove_file(&path).map_err(|e| io_err(&path, e))
    }

    /// Persists one run and every diagnostic it produced. Diagnostics
    /// already on disk (by `contentHash`) gain this run as an additional
    /// reference rather than being duplicated.
    pub fn append_run(
        &self,
        record: &RunRecord,
        diagnostics: &[Diagnostic],
    ) -> Result<(), StorageError> {
        let run_id = record.identity.id.as_str();
        write_json(&self.run_path(run_id), record)?;

        for diagnostic in diagnostics {
            let path = self.diagnostic_path(&diagnostic.content_hash);
            let mut entry = if path.exists() {
                read_json::<DiagnosticRecord>(&path)?
            } else {
                DiagnosticRecord::new(diagnostic.clone(), run_id)
            };
            entry.referencing_runs.insert(run_id.to_string());
            write_json(&path, &entry)?;
        }
        Ok(())
    }

    pub fn get_run(&self, run_id: &str) -> Result<RunRecord, StorageError> {
        let path = self.run_path(run_id);
        if !path.exists() {
            return Err(StorageError::RunNotFound(run_id.to_string()));
        }
        read_json(&path)
    }

    pub fn list_runs(&self) -> Result<Vec<RunRecord>, StorageError> {
        let dir = self.root.join(RUNS_DIR);
        let mut out = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            out.push(read_json(&entry.path())?);
        }
        Ok(out)
    }

    pub(crate) fn all_diagnostic_records(&self) -> Result<Vec<DiagnosticRecord>, StorageError> {
        let dir = self.root.join(DIAGNOSTICS_DIR);
        let mut out = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            out.push(read_json(&entry.path())?);
        }
        Ok(out)
    }

    /// Every diagnostic `run_id` produced, resolved from its stored content
    /// hashes.
    pub fn list_errors_by_run(&self, run_id: &str) -> Result<Vec<Diagnostic>, StorageError> {
        let record = self.get_run(run_id)?;
        record
            .diagnostic_hashes
            .iter()
            .map(|hash| read_json::<DiagnosticRecord>(&self.diagnostic_path(hash)).map(|r| r.diagnostic))
            .collect()
    }

    /// Every diagnostic across all runs that nobody has acknowledged yet.
    pub fn list_open_errors(&self) -> Result<Vec<Diagnostic>, StorageError> {
        Ok(self
            .all_diagnostic_records()?
            .into_iter()
            .filter(DiagnosticRecord::is_open)
            .map(|r| r.diagnostic)
            .collect())
    }

    /// Marks a diagnostic acknowledged by content hash. Returns `false` if
    /// no such diagnostic exists.
    pub fn mark_acknowledged(&self, content_hash: &str) -> Result<bool, StorageError> {
        let path = self.diagnostic_path(content_hash);
        if !path.exists() {
            return Ok(false);
        }
        let mut record: DiagnosticRecord = read_json(&path)?;
        record.acknowledged = true;
        write_json(&path, &record)?;
        Ok(true)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
