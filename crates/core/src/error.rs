//! Unified error type for the concurrency core.
//!
//! A failed commit validation is a protocol outcome (the commit path
//! returns `bool`, never an error), so it has no variant here.
//! `CapacityExceeded` and `LatchMisuse` are debug-assertion-fatal on the hot
//! path; the variants exist so tests can assert on them directly instead of
//! only via `debug_assert!`.

use thiserror::Error;

/// All errors the concurrency core can surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The access log reached `max_access_log_len`.
    #[error("access log capacity exceeded: {attempted} accesses, limit {limit}")]
    CapacityExceeded {
        /// Number of accesses that would have been recorded.
        attempted: usize,
        /// Configured `max_access_log_len`.
        limit: usize,
    },

    /// A latch mode was released without being held, or certify was
    /// requested without a held write guard.
    #[error("latch misuse: {0}")]
    LatchMisuse(&'static str),

    /// Shadow allocation failed for a `ReadWrite` access.
    #[error("shadow allocation failed for table {table_id}")]
    AllocationFailure {
        /// The table the failed access targeted.
        table_id: crate::types::TableId,
    },

    /// `abort` was called on a manager with no mid-transaction abort support
    /// under optimistic concurrency control.
    #[error("abort is not supported mid-transaction under optimistic concurrency control")]
    AbortNotSupported,
}

impl CoreError {
    /// Whether a caller can reasonably retry the operation that produced
    /// this error (a transient shadow-allocation failure under memory
    /// pressure), as opposed to a programming error that will recur
    /// identically on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::AllocationFailure { .. })
    }

    /// Whether this error represents an invariant violation — the caller
    /// sized or used the API incorrectly to produce it — rather than a
    /// transient runtime condition (`CapacityExceeded` and `LatchMisuse` are
    /// debug-assertion-fatal on the hot path; `AbortNotSupported` is always
    /// a caller error).
    pub fn is_fatal(&self) -> bool {
        !self.is_retryable()
    }
}

/// Result alias for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
