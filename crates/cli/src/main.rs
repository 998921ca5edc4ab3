// SPDX-License-Identifier: MIT

//! Thin invoker over `detent-orchestrator`. No subcommand surface, help
//! text, or branding (spec.md §1 Non-goals) — just the four-phase contract
//! wired to process args, signals, and exit codes.

use std::path::PathBuf;
use std::sync::Arc;

use detent_core::{Clock, Config, PresentationHints, RunConfig, SystemClock};
use detent_orchestrator::{compute_identity, first_commit, Orchestrator};

/// What the invoker needs before Prepare can start (spec.md §6): repoRoot,
/// optional workflow file, optional event, everything else defaulted.
struct Invocation {
    repo_root: PathBuf,
    workflow_file: Option<String>,
    event: String,
    log_file: Option<PathBuf>,
}

fn parse_args() -> Invocation {
    let default_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let default_event = std::env::var("DETENT_EVENT").unwrap_or_else(|_| "push".to_string());
    let default_log_file = std::env::var("DETENT_LOG_FILE").ok().map(PathBuf::from);
    parse_args_from(std::env::args().skip(1), default_root, default_event, default_log_file)
}

/// The testable core of argument parsing: everything process-global
/// (`std::env::args`/`current_dir`) is resolved by the caller so tests can
/// supply their own inputs.
fn parse_args_from(
    args: impl Iterator<Item = String>,
    default_root: PathBuf,
    default_event: String,
    default_log_file: Option<PathBuf>,
) -> Invocation {
    let mut repo_root = default_root;
    let mut workflow_file = None;
    let mut event = default_event;
    let mut log_file = default_log_file;

    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--workflow" => workflow_file = args.next(),
            "--event" => {
                if let Some(v) = args.next() {
                    event = v;
                }
            }
            "--log-file" => log_file = args.next().map(PathBuf::from),
            other => repo_root = PathBuf::from(other),
        }
    }

    Invocation {
        repo_root,
        workflow_file,
        event,
        log_file,
    }
}

fn init_logging(
    log_file: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("DETENT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("detent.log"));
            let appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let invocation = parse_args();
    let _guard = init_logging(invocation.log_file.as_deref());

    let exit_code = match run(invocation).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(kind = %err.kind(), message = %err.message(), "run failed");
            eprintln!("detent: {err}");
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run(invocation: Invocation) -> Result<i32, detent_core::DetentError> {
    let repo_root = std::fs::canonicalize(&invocation.repo_root).map_err(|source| {
        detent_core::DetentError::with_source(
            detent_core::ErrorKind::InvalidConfig,
            format!("cannot resolve repoRoot {}", invocation.repo_root.display()),
            source,
        )
    })?;

    let identity = compute_identity(&repo_root)?;
    let _repo_first_commit = first_commit(&repo_root)?;

    let run_config = RunConfig::new(
        repo_root.clone(),
        repo_root.join(".github/workflows"),
        invocation.workflow_file,
        invocation.event,
        identity.id.as_str(),
        PresentationHints {
            use_tui: false,
            stream_output: true,
        },
    )?;

    let config = Config::load()?;
    let store_root = repo_root.join(".detent");
    let checkouts_root = store_root.join("checkouts");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let mut orchestrator = Orchestrator::new(run_config, config, identity, clock, checkouts_root, store_root);
    if let Ok(runner_binary) = std::env::var("DETENT_RUNNER_BINARY") {
        orchestrator = orchestrator.with_runner_binary(runner_binary);
    }

    let cancel = orchestrator.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut events = orchestrator.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(?event, "run event");
        }
    });

    let result = match orchestrator.prepare().await {
        Ok(()) => orchestrator.run().await,
        Err(e) => Err(e),
    };

    let outcome = match result {
        Ok(()) => orchestrator.persist(),
        Err(e) => {
            let _ = orchestrator.cleanup().await;
            return Err(e);
        }
    };

    orchestrator.cleanup().await?;
    let result = outcome?;

    tracing::info!(
        exit_code = result.exit_code,
        cancelled = result.cancelled,
        error_count = result.error_count,
        duration_ms = result.duration_ms,
        reclaimed_orphans = result.reclaimed_orphans,
        "run finished"
    );

    // spec.md §6 exit code mapping: 0 = no errors and runner exitCode 0;
    // 1 = errors found or runner exit non-zero; 130 = cancelled.
    if result.cancelled {
        Ok(130)
    } else if result.error_count > 0 || result.exit_code != 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
