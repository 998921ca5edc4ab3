// SPDX-License-Identifier: MIT

//! Spawns the runner subprocess, pipes its output line-by-line to observers,
//! and kills its process group on cancellation (spec.md §4.6).

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::cancel::CancelHandle;
use crate::env_filter::filtered_env;
use crate::error::DriverError;
use crate::line_splitter::LineSplitter;
use crate::ring_buffer::RingBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone)]
pub struct LineEvent {
    pub source: StreamSource,
    pub line: String,
}

/// The exit code reported when a run was cancelled, matching the POSIX
/// convention for SIGINT (2) plus 128 that most shells use, and the value
/// spec.md §5/§7 hardcodes regardless of the OS-specific signal delivered.
pub const CANCELLED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub cancelled: bool,
    /// Full captured output, bounded by the ring buffer, for diagnostics that
    /// need a second look after the line stream has already been consumed.
    pub stdout_tail: String,
    pub stderr_tail: String,
}

const CHUNK_SIZE: usize = 64 * 1024;

async fn pump_stream(
    mut reader: impl tokio::io::AsyncRead + Unpin,
    source: StreamSource,
    ring_cap: usize,
    line_tx: mpsc::UnboundedSender<LineEvent>,
) -> RingBuffer {
    let mut ring = RingBuffer::new(ring_cap);
    let mut splitter = LineSplitter::new();
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, ?source, "error reading subprocess stream");
                break;
            }
        };
        ring.push(&chunk[..n]);
        for line in splitter.feed(&chunk[..n]) {
            let _ = line_tx.send(LineEvent { source, line });
        }
    }
    if let Some(partial) = splitter.flush_partial() {
        let _ = line_tx.send(LineEvent {
            source,
            line: partial,
        });
    }
    ring
}

/// Spawns `program`/`args` with cwd `cwd`, an environment filtered per
/// spec.md §4.6 plus `extra_env`, and drives it to completion or
/// cancellation. Every emitted line is sent on `line_tx` in the order it was
/// read from its originating stream; stdout and stderr have no relative
/// ordering guarantee (spec.md §4.7, §5).
pub async fn run(
    program: &str,
    args: &[String],
    cwd: &Path,
    extra_env: &[(String, String)],
    ring_buffer_bytes: usize,
    cancel: CancelHandle,
    line_tx: mpsc::UnboundedSender<LineEvent>,
) -> Result<RunOutcome, DriverError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .env_clear()
        .envs(filtered_env())
        .envs(extra_env.iter().cloned())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // Safety: the closure only runs as a `pre_exec` hook between fork and
        // exec in the child, where `setsid` is the only syscall it performs.
        unsafe {
            cmd.pre_exec(|| unsafe { crate::process_group::unix::become_group_leader() });
        }
    }

    let mut child = cmd.spawn().map_err(|source| DriverError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let pid = child.id();
    let stdout = child.stdout.take().ok_or_else(|| {
        DriverError::Io(std::io::Error::other("child stdout pipe was not set up"))
    })?;
    let stderr = child.stderr.take().ok_or_else(|| {
        DriverError::Io(std::io::Error::other("child stderr pipe was not set up"))
    })?;

    let stdout_task = tokio::spawn(pump_stream(
        stdout,
        StreamSource::Stdout,
        ring_buffer_bytes,
        line_tx.clone(),
    ));
    let stderr_task = tokio::spawn(pump_stream(
        stderr,
        StreamSource::Stderr,
        ring_buffer_bytes,
        line_tx,
    ));

    let (cancelled, status) = tokio::select! {
        status = child.wait() => {
            (false, status.map_err(DriverError::Wait)?)
        }
        _ = cancel.cancelled() => {
            if let Some(pid) = pid {
                terminate_process_group(pid);
            }
            // Drain until streams close per spec.md §4.1: cancellation must
            // wait for pending output, not truncate it.
            let status = child.wait().await.map_err(DriverError::Wait)?;
            (true, status)
        }
    };

    let stdout_ring = stdout_task.await.unwrap_or_else(|_| RingBuffer::new(ring_buffer_bytes));
    let stderr_ring = stderr_task.await.unwrap_or_else(|_| RingBuffer::new(ring_buffer_bytes));

    let exit_code = if cancelled {
        CANCELLED_EXIT_CODE
    } else {
        exit_code_of(status)
    };

    Ok(RunOutcome {
        exit_code,
        cancelled,
        stdout_tail: stdout_ring.as_string_lossy(),
        stderr_tail: stderr_ring.as_string_lossy(),
    })
}

#[cfg(unix)]
fn terminate_process_group(pid: u32) {
    use nix::sys::signal::Signal;
    if crate::process_group::unix::kill_group(pid, Signal::SIGTERM).is_ok() {
        tracing::info!(pid, "sent SIGTERM to process group");
    }
}

#[cfg(not(unix))]
fn terminate_process_group(_pid: u32) {
    crate::process_group::fallback::note_unsupported();
}

#[cfg(unix)]
fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|s| 128 + s))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
