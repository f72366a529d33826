//! `AtomicClock`: an `AtomicU64`-backed `ScalableTimestamp`.

use std::sync::atomic::{AtomicU64, Ordering};

use occdb_core::ScalableTimestamp;

/// A lock-free monotone counter doubling as the timestamp oracle and the
/// commit-timestamp generator.
///
/// `generate_commit_ts` is the load-bearing half of the contract: it
/// CAS-loops the shared counter forward past `max(global, max_rw)` and
/// returns the value it claimed, so the result is always strictly greater
/// than `max_rw`, at least `global`, and unique — no two calls, concurrent
/// or sequential, ever claim the same counter value.
#[derive(Debug, Default)]
pub struct AtomicClock {
    counter: AtomicU64,
}

impl AtomicClock {
    /// A clock starting at zero.
    pub fn new() -> Self {
        Self::with_start(0)
    }

    /// A clock starting at `start`, e.g. to resume after a restart.
    pub fn with_start(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }
}

impl ScalableTimestamp for AtomicClock {
    fn get_timestamp(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    fn generate_commit_ts(&self, global: u64, max_rw: u64) -> u64 {
        let floor = global.max(max_rw);
        loop {
            let current = self.counter.load(Ordering::SeqCst);
            let candidate = current.max(floor) + 1;
            if self
                .counter
                .compare_exchange_weak(current, candidate, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return candidate;
            }
        }
    }
}
