//! The `MemAllocator` trait: thread-local shadow allocation for `ReadWrite`
//! accesses.

use crate::record::Record;

/// Allocates and frees shadow copies of a record's payload.
///
/// Each transaction's `ReadWrite` accesses need a private, mutable copy of
/// the touched record to stage edits in before commit publishes them. The
/// manager never constructs a shadow directly — it always goes through this
/// trait, so a caller can swap in pooled or arena allocation without
/// touching the manager.
pub trait MemAllocator<R: Record>: Send + Sync {
    /// Allocates a shadow initialized from `source`. Returns `None` on
    /// allocation failure, which the manager treats as a transaction
    /// failure, not a panic.
    fn alloc(&self, source: &R) -> Option<R>;

    /// Frees a shadow that was never published (commit failed, or the access
    /// log entry wasn't selected for writeback).
    fn free(&self, shadow: R);
}
