// SPDX-License-Identifier: MIT

//! Phase sequencing for one run (spec.md §4.1): `Prepare` → `Run` → `Persist`
//! → `Cleanup`, each idempotent on failure, with a single `CancelHandle`
//! governing Prepare and Run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use detent_core::{Clock, Config, Diagnostic, RunConfig, RunIdentity};
use detent_driver::{CancelHandle, LineEvent};
use detent_extractor::{Extractor, UnmatchedTelemetry};
use detent_parser::{Event, EventParser};
use detent_storage::{RunRecord, Store};
use detent_transformer::{Manifest, TransformInput, Transformer};

use crate::error::{from_driver, from_storage, from_transform};
use crate::event_bus::EventBus;
use crate::identity;
use crate::isolator::{Checkout, Isolator};
use crate::preflight::{self, PreflightCheck};

/// What the invoking CLI sees once a run is over (spec.md §6).
#[derive(Debug, Clone)]
pub struct RunResult {
    pub exit_code: i32,
    pub cancelled: bool,
    pub error_count: usize,
    pub duration_ms: i64,
    /// Orphaned checkouts reclaimed during this run's Prepare phase
    /// (SPEC_FULL.md §C.2).
    pub reclaimed_orphans: usize,
}

struct Prepared {
    checkout: Checkout,
    workflow_temp_dir: tempfile::TempDir,
    manifest: Manifest,
}

/// Drives one run end to end. Not `Clone`/`Sync`: the orchestrator is the
/// single owner of the run's resources until `cleanup` releases them
/// (spec.md §3 Ownership).
pub struct Orchestrator {
    run_config: RunConfig,
    config: Config,
    identity: RunIdentity,
    clock: Arc<dyn Clock>,
    isolator: Isolator,
    store_root: PathBuf,
    runner_binary: String,
    checks: Vec<Box<dyn PreflightCheck>>,
    cancel: CancelHandle,
    event_bus: EventBus,
    reclaimed_orphans: usize,
    started_at_ms: i64,
    prepared: Option<Prepared>,
    last_run: Option<(i32, bool, Vec<Diagnostic>, UnmatchedTelemetry)>,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        run_config: RunConfig,
        config: Config,
        identity: RunIdentity,
        clock: Arc<dyn Clock>,
        checkouts_root: impl Into<PathBuf>,
        store_root: impl Into<PathBuf>,
    ) -> Self {
        let isolator = Isolator::new(run_config.repo_root(), checkouts_root.into());
        Self {
            run_config,
            config,
            identity,
            clock,
            isolator,
            store_root: store_root.into(),
            runner_binary: "act".to_string(),
            checks: preflight::default_checks(),
            cancel: CancelHandle::new(),
            event_bus: EventBus::new(),
            reclaimed_orphans: 0,
            started_at_ms: 0,
            prepared: None,
            last_run: None,
        }
    }

    /// Overrides the default preflight registry (SPEC_FULL.md §C.1).
    pub fn with_checks(mut self, checks: Vec<Box<dyn PreflightCheck>>) -> Self {
        self.checks = checks;
        self
    }

    pub fn with_runner_binary(mut self, binary: impl Into<String>) -> Self {
        self.runner_binary = binary.into();
        self
    }

    /// Registers an observer for this run's events. Must be called before
    /// `run` to see the Manifest event published at Prepare end.
    pub fn subscribe(&mut self) -> crate::event_bus::Subscription {
        self.event_bus.subscribe()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Runs Preflight, the Isolator, and the Transformer (spec.md §4.1 step 1).
    /// All resources acquired up to a failure point are released before
    /// returning.
    pub async fn prepare(&mut self) -> Result<(), detent_core::DetentError> {
        self.started_at_ms = self.clock.epoch_ms();
        self.reclaimed_orphans = self.isolator.sweep_orphans();

        preflight::run_preflight(&self.run_config, std::mem::take(&mut self.checks)).await?;

        let repo_first_commit = identity::first_commit(self.run_config.repo_root())?;

        let inputs = discover_workflows(
            self.run_config.repo_root(),
            self.run_config.workflow_dir(),
            self.run_config.workflow_file(),
        )?;

        let checkout_fut = self.isolator.create(self.run_config.run_id(), &self.identity.commit);
        let transform_fut = async {
            Transformer::new(&self.config)
                .transform(&inputs, &repo_first_commit)
                .map_err(from_transform)
        };
        let (checkout, transform_output) = tokio::join!(checkout_fut, transform_fut);

        let checkout = match checkout {
            Ok(c) => c,
            Err(e) => return Err(e),
        };
        let transform_output = match transform_output {
            Ok(t) => t,
            Err(e) => {
                let _ = checkout.cleanup().await;
                return Err(e);
            }
        };

        for warning in &transform_output.warnings {
            tracing::warn!(%warning, "workflow transform warning");
        }

        let workflow_temp_dir = tempfile::tempdir().map_err(|source| {
            detent_core::DetentError::with_source(
                detent_core::ErrorKind::TransformFailed,
                "failed to create temp directory for rewritten workflows",
                source,
            )
        })?;
        for file in &transform_output.files {
            detent_transformer::serialize::write_rewritten(
                workflow_temp_dir.path(),
                &file.relative_name,
                &file.contents,
            )
            .map_err(from_transform)?;
        }

        // Delivered directly to observers at Prepare end (spec.md §3); the
        // manifest marker line written into the rewritten workflow carries
        // the same bytes for any observer that only attaches during Run.
        if let Some(parsed) = detent_parser::decode_manifest(
            &transform_output.manifest.to_base64().unwrap_or_default(),
        ) {
            self.event_bus.publish(Event::Manifest(parsed));
        }

        self.prepared = Some(Prepared {
            checkout,
            workflow_temp_dir,
            manifest: transform_output.manifest,
        });
        Ok(())
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.prepared.as_ref().map(|p| &p.manifest)
    }

    /// Drives the runner subprocess to completion or cancellation (spec.md
    /// §4.1 step 2). A non-zero exit is not an error.
    pub async fn run(&mut self) -> Result<(), detent_core::DetentError> {
        let prepared = self.prepared.as_ref().ok_or_else(|| {
            detent_core::DetentError::new(
                detent_core::ErrorKind::RunnerFailed,
                "run() called before a successful prepare()",
            )
        })?;

        let args = vec![
            self.run_config.event().to_string(),
            "-W".to_string(),
            prepared.workflow_temp_dir.path().display().to_string(),
            "-C".to_string(),
            prepared.checkout.path.display().to_string(),
        ];
        let extra_env: Vec<(String, String)> = vec![
            ("CI".to_string(), "true".to_string()),
            ("LEFTHOOK".to_string(), "0".to_string()),
            ("HUSKY".to_string(), "0".to_string()),
            ("PRE_COMMIT_ALLOW_NO_CONFIG".to_string(), "1".to_string()),
        ];

        let (line_tx, mut line_rx) = mpsc::unbounded_channel::<LineEvent>();
        let mut parser = EventParser::new();
        let mut captured_lines = Vec::new();

        let cwd = prepared.checkout.path.clone();
        let cancel = self.cancel.clone();
        let runner_binary = self.runner_binary.clone();
        let ring_bytes = self.config.ring_buffer_bytes;

        let driver_fut = detent_driver::run(
            &runner_binary,
            &args,
            &cwd,
            &extra_env,
            ring_bytes,
            cancel,
            line_tx,
        );
        tokio::pin!(driver_fut);

        let mut line_rx_open = true;
        let outcome = loop {
            tokio::select! {
                biased;
                maybe_line = line_rx.recv(), if line_rx_open => {
                    match maybe_line {
                        Some(line_event) => {
                            captured_lines.push(line_event.line.clone());
                            if let Some(event) = parser.feed_line(&line_event.line) {
                                // Manifest was already published at Prepare end.
                                if !matches!(event, Event::Manifest(_)) {
                                    self.event_bus.publish(event);
                                }
                            }
                        }
                        None => line_rx_open = false,
                    }
                }
                outcome = &mut driver_fut => {
                    break outcome.map_err(from_driver)?;
                }
            }
        };
        // Drain whatever lines arrived between the driver's exit and the
        // channel closing.
        while let Ok(line_event) = line_rx.try_recv() {
            captured_lines.push(line_event.line.clone());
            if let Some(event) = parser.feed_line(&line_event.line) {
                if !matches!(event, Event::Manifest(_)) {
                    self.event_bus.publish(event);
                }
            }
        }

        let extraction = Extractor::new().extract(
            captured_lines.iter().map(String::as_str),
            &prepared.checkout.path,
        );

        self.last_run = Some((
            outcome.exit_code,
            outcome.cancelled,
            extraction.diagnostics,
            extraction.unmatched,
        ));

        Ok(())
    }

    /// Writes the `RunRecord` (spec.md §4.1 step 3).
    pub fn persist(&mut self) -> Result<RunResult, detent_core::DetentError> {
        let (exit_code, cancelled, diagnostics, unmatched) = self.last_run.take().ok_or_else(|| {
            detent_core::DetentError::new(
                detent_core::ErrorKind::RunnerFailed,
                "persist() called before a successful run()",
            )
        })?;

        let finished_at_ms = self.clock.epoch_ms();
        let workflow_name = self
            .run_config
            .workflow_file()
            .map(str::to_string)
            .unwrap_or_else(|| "all".to_string());
        let record = RunRecord::new(
            self.identity.clone(),
            workflow_name,
            self.started_at_ms,
            finished_at_ms,
            exit_code,
            cancelled,
            &diagnostics,
            unmatched.error_like,
        );

        let store = Store::open(self.store_root.clone()).map_err(from_storage)?;
        store.append_run(&record, &diagnostics).map_err(from_storage)?;

        Ok(RunResult {
            exit_code,
            cancelled,
            error_count: diagnostics.len(),
            duration_ms: finished_at_ms - self.started_at_ms,
            reclaimed_orphans: self.reclaimed_orphans,
        })
    }

    /// Releases the transformer temp directory, then the isolator checkout,
    /// in that order (spec.md §4.1 step 4). Safe to call more than once and
    /// after a partial `prepare`.
    pub async fn cleanup(&mut self) -> Result<(), detent_core::DetentError> {
        let Some(prepared) = self.prepared.take() else {
            return Ok(());
        };
        // Dropping removes the temp directory; errors here are not
        // resource-critical the way a stuck checkout is.
        drop(prepared.workflow_temp_dir);
        prepared.checkout.cleanup().await
    }
}

fn discover_workflows(
    repo_root: &Path,
    workflow_dir: &Path,
    workflow_file: Option<&str>,
) -> Result<Vec<TransformInput>, detent_core::DetentError> {
    let read_err = |source: std::io::Error| {
        detent_core::DetentError::with_source(
            detent_core::ErrorKind::InvalidConfig,
            format!("cannot read workflow directory {}", workflow_dir.display()),
            source,
        )
    };

    let mut names: Vec<String> = if let Some(file) = workflow_file {
        vec![file.to_string()]
    } else {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(workflow_dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let path = entry.path();
            let is_workflow = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yml") | Some("yaml")
            );
            if is_workflow {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        names
    };
    names.dedup();

    let mut inputs = Vec::with_capacity(names.len());
    for name in names {
        let path = workflow_dir.join(&name);
        let source = std::fs::read_to_string(&path).map_err(|e| {
            detent_core::DetentError::with_source(
                detent_core::ErrorKind::InvalidConfig,
                format!("cannot read workflow {}", path.display()),
                e,
            )
        })?;
        let relative_name = path
            .strip_prefix(repo_root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        inputs.push(TransformInput { relative_name, source });
    }
    Ok(inputs)
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
