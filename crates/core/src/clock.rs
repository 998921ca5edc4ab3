// SPDX-License-Identifier: MIT

//! Time abstraction so orchestrator/transformer logic can be driven by a fake clock in tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Anything that can report the current wall-clock time, in whole milliseconds
/// since the Unix epoch.
///
/// Passed by reference (`&impl Clock` or `&dyn Clock`) into anything that needs to
/// stamp a `RunRecord` or measure elapsed duration, so tests can substitute
/// [`FakeClock`] for deterministic `startedAt`/`finishedAt` values.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> i64;
}

/// Production clock backed by [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        now.as_millis() as i64
    }
}

/// Test clock with an explicit, manually advanced time.
pub struct FakeClock {
    now_ms: AtomicI64,
}

impl FakeClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    /// Advances the fake clock by `ms` and returns the new time.
    pub fn advance(&self, ms: i64) -> i64 {
        self.now_ms.fetch_add(ms, Ordering::SeqCst) + ms
    }

    pub fn set(&self, epoch_ms: i64) {
        self.now_ms.store(epoch_ms, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
