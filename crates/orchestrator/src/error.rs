// SPDX-License-Identifier: MIT

//! Maps the per-crate error types the orchestrator depends on into the
//! shared [`DetentError`]/[`ErrorKind`] taxonomy (spec.md §7).

use detent_core::{DetentError, ErrorKind};
use detent_driver::DriverError;
use detent_storage::StorageError;
use detent_transformer::TransformError;

pub fn from_transform(err: TransformError) -> DetentError {
    DetentError::with_source(ErrorKind::TransformFailed, err.to_string(), err)
}

pub fn from_driver(err: DriverError) -> DetentError {
    DetentError::with_source(ErrorKind::RunnerFailed, err.to_string(), err)
}

pub fn from_storage(err: StorageError) -> DetentError {
    let kind = match &err {
        StorageError::Locked(_) => ErrorKind::Locked,
        _ => ErrorKind::PersistFailed,
    };
    DetentError::with_source(kind, err.to_string(), err)
}
