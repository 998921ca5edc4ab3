// SPDX-License-Identifier: MIT

//! Errors raised by the run-persistence store (spec.md §4.9).

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record at {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no run record for {0}")]
    RunNotFound(String),

    #[error(".detent store at {0} is locked by another writer")]
    Locked(String),
}
