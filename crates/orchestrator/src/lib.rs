// SPDX-License-Identifier: MIT

//! Ties the transformer, driver, parser, extractor, and storage crates
//! together into the four-phase run contract (spec.md §4.1): Prepare, Run,
//! Persist, Cleanup.

mod error;
mod event_bus;
mod identity;
mod isolator;
mod orchestrator;
mod preflight;

pub use detent_driver::CancelHandle;
pub use event_bus::{EventBus, Subscription};
pub use identity::{compute as compute_identity, first_commit};
pub use isolator::{Checkout, Isolator};
pub use orchestrator::{Orchestrator, RunResult};
pub use preflight::{
    default_checks, CheckOutcome, ContainerEngineCheck, NoEscapingSymlinksCheck,
    NoSubmodulesCheck, PreflightCheck, RepositoryPresentCheck, RunnerBinaryCheck,
};
