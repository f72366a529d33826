//! The `ScalableTimestamp` trait: the external timestamp oracle collaborator.
//!
//! The core never generates timestamps itself beyond combining the oracle's
//! output with the highest snapshot timestamp observed during validation.
//! `generate_commit_ts`'s contract is load-bearing: if it ever returns a
//! value `<= max_rw`, serializability breaks, so implementors are expected
//! to test the boundary case explicitly.

/// A monotone, globally-unique source of commit timestamps.
///
/// Given any `(global, max_rw)` pair observed during a commit, the returned
/// value must be strictly greater than `max_rw` and at least `global`, and
/// unique within the process.
pub trait ScalableTimestamp: Send + Sync {
    /// Returns the oracle's current global timestamp. Lock-free, monotone,
    /// safe to call without holding any latch.
    fn get_timestamp(&self) -> u64;

    /// Combines the oracle's `global` reading with `max_rw`, the highest
    /// snapshot timestamp any access in the committing transaction observed,
    /// into a commit timestamp.
    ///
    /// Contract: the result is strictly greater than `max_rw` and at least
    /// `global`, and unique within the process (no two calls, concurrent or
    /// sequential, ever return the same value). Violating this breaks
    /// monotonicity of commit timestamps across the whole engine.
    fn generate_commit_ts(&self, global: u64, max_rw: u64) -> u64;
}

impl<T: ScalableTimestamp + ?Sized> ScalableTimestamp for std::sync::Arc<T> {
    fn get_timestamp(&self) -> u64 {
        (**self).get_timestamp()
    }

    fn generate_commit_ts(&self, global: u64, max_rw: u64) -> u64 {
        (**self).generate_commit_ts(global, max_rw)
    }
}
