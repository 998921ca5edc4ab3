// SPDX-License-Identifier: MIT

//! Data model and cross-cutting primitives shared by every `detent-*` crate.
//!
//! This crate has no I/O of its own: it defines the types that pass between the
//! transformer, driver, parser, extractor, storage, and orchestrator crates, plus
//! a handful of small abstractions (`Clock`, `ShortId`) that keep those crates
//! testable without real wall-clock time or random IDs.

#[macro_use]
pub mod id;

pub mod clock;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod ids;
pub mod run_config;
pub mod run_identity;
pub mod time_fmt;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::Config;
pub use diagnostic::{Diagnostic, Severity};
pub use error::{DetentError, ErrorKind};
pub use ids::{JobId, RunId};
pub use run_config::{PresentationHints, RunConfig};
pub use run_identity::RunIdentity;
