//! The `Logger` trait: the write-ahead (value- or command-logging)
//! collaborator.
//!
//! The core emits one event per write-back access during commit plus a
//! trailing commit event; it never blocks on the result — logging failures
//! are opaque to the core, fire-and-forget. A build picks either value
//! logging (`update_record`/`insert_record`/`delete_record` carry the new
//! bytes) or command logging (`commit_transaction` carries `txn_type` and
//! `param` instead) — both live on the same trait with default no-op bodies
//! so an implementation only overrides the half it actually uses; selection
//! is a compile-time or init-time choice, with only one variant active per
//! build.

use crate::record::Record;
use crate::types::{TableId, ThreadId, TxnParam, TxnType};

/// Write-ahead logging sink for committed record mutations.
///
/// Every method defaults to a no-op so a command-logging build only
/// implements [`commit_transaction`](Self::commit_transaction) and a
/// value-logging build only implements the per-record mutation hooks.
pub trait Logger<R: Record>: Send + Sync {
    /// A `ReadWrite` access published its shadow into the live record.
    fn update_record(&self, _thread: ThreadId, _table_id: TableId, _new_value: &R) {}

    /// An `InsertOnly` access became visible.
    fn insert_record(&self, _thread: ThreadId, _table_id: TableId, _new_value: &R) {}

    /// A `DeleteOnly` access became invisible.
    fn delete_record(&self, _thread: ThreadId, _table_id: TableId, _primary_key: u64) {}

    /// The transaction as a whole committed at `global_ts` (value-logging
    /// variant), or at `global_ts` under `txn_type`/`param` (command-logging
    /// variant).
    fn commit_transaction(
        &self,
        _thread: ThreadId,
        _global_ts: u64,
        _txn_type: TxnType,
        _param: &TxnParam,
    ) {
    }
}

impl<R: Record, T: Logger<R> + ?Sized> Logger<R> for std::sync::Arc<T> {
    fn update_record(&self, thread: ThreadId, table_id: TableId, new_value: &R) {
        (**self).update_record(thread, table_id, new_value)
    }

    fn insert_record(&self, thread: ThreadId, table_id: TableId, new_value: &R) {
        (**self).insert_record(thread, table_id, new_value)
    }

    fn delete_record(&self, thread: ThreadId, table_id: TableId, primary_key: u64) {
        (**self).delete_record(thread, table_id, primary_key)
    }

    fn commit_transaction(&self, thread: ThreadId, global_ts: u64, txn_type: TxnType, param: &TxnParam) {
        (**self).commit_transaction(thread, global_ts, txn_type, param)
    }
}
