// SPDX-License-Identifier: MIT

//! Turns runner output lines into normalized [`detent_core::Diagnostic`]s
//! (spec.md §4.8): an extensible registry of tool-specific line parsers,
//! followed by severity overrides, source-snippet attachment,
//! content-hash dedup, and grouping for downstream consumers.

mod dedup;
mod extract;
mod grouping;
mod parsers;
mod registry;
mod severity;
mod snippet;
mod telemetry;

pub use extract::{ExtractionResult, Extractor};
pub use grouping::UNLOCATED_FILE_KEY;
pub use parsers::LineParser;
pub use registry::ParserRegistry;
pub use severity::SeverityRule;
pub use snippet::SnippetStats;
pub use telemetry::UnmatchedTelemetry;
