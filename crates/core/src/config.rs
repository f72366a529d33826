//! Construction-time configuration for the concurrency core.
//!
//! A runtime-configurable access log capacity, so tests can exercise the
//! capacity boundary without recompiling.

/// Tuning knobs for an `AccessLog` / `TransactionManager` pair.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Maximum number of accesses a single transaction may record before
    /// `append` returns `CoreError::CapacityExceeded`. A few hundred is
    /// typical for most workloads.
    pub max_access_log_len: usize,

    /// Slack tolerated between the external timestamp oracle's global clock
    /// and the highest snapshot timestamp observed during validation, added
    /// before calling `generate_commit_ts`.
    pub commit_ts_slack: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_access_log_len: 256,
            commit_ts_slack: 0,
        }
    }
}
