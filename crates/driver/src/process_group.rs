// SPDX-License-Identifier: MIT

//! Process-group management so cancellation reaches containers the runner
//! spawned, not just the runner itself (spec.md §4.6, §5, §8 property 6).

#[cfg(unix)]
pub mod unix {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    /// Places the about-to-exec child in its own session/process group, so a
    /// later `killpg` reaches every descendant it spawns.
    ///
    /// # Safety
    /// Must only be used as a `pre_exec` hook: it runs in the forked child
    /// between `fork` and `exec`, where only async-signal-safe calls are
    /// permitted. `setsid` is async-signal-safe.
    pub unsafe fn become_group_leader() -> std::io::Result<()> {
        nix::unistd::setsid()
            .map(|_| ())
            .map_err(|e| std::io::Error::from_raw_os_error(e as i32))
    }

    /// Sends `signal` to every process in the group led by `pid`. Best-effort:
    /// `ESRCH` (already gone) is not an error.
    pub fn kill_group(pid: u32, sig: Signal) -> std::io::Result<()> {
        let pgid = Pid::from_raw(pid as i32);
        match signal::killpg(pgid, sig) {
            Ok(()) => Ok(()),
            Err(nix::errno::Errno::ESRCH) => Ok(()),
            Err(e) => Err(std::io::Error::from_raw_os_error(e as i32)),
        }
    }

    pub fn terminate_then_kill(pid: u32) -> std::io::Result<()> {
        kill_group(pid, Signal::SIGTERM)
    }

    pub fn force_kill(pid: u32) -> std::io::Result<()> {
        kill_group(pid, Signal::SIGKILL)
    }
}

/// Non-POSIX hosts have no process-group concept reachable from this crate
/// without a platform-specific job-object API; cancellation falls back to
/// signalling the direct child only (spec.md §4.6, §9 design notes), and
/// container cleanup in that case is the runner's own responsibility.
#[cfg(not(unix))]
pub mod fallback {
    pub fn note_unsupported() {
        tracing::warn!(
            "process-group cancellation is unavailable on this platform; \
             only the direct child will be signalled"
        );
    }
}
