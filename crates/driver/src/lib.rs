// SPDX-License-Identifier: MIT

//! Subprocess execution for the local runner invocation (spec.md §4.6):
//! environment filtering, line-oriented output capture, and process-group
//! cancellation.

pub mod cancel;
pub mod driver;
pub mod env_filter;
pub mod error;
pub mod line_splitter;
pub mod process_group;
pub mod ring_buffer;

pub use cancel::CancelHandle;
pub use driver::{run, LineEvent, RunOutcome, StreamSource, CANCELLED_EXIT_CODE};
pub use error::DriverError;
