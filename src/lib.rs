//! # occdb
//!
//! The concurrency-control core of an in-memory OLTP transaction engine: a
//! per-record Certify/Wait latch and an optimistic concurrency control (OCC)
//! transaction manager built on top of it.
//!
//! This facade crate re-exports the pieces split across the workspace so a
//! caller only needs one `use`:
//!
//! - [`occdb_core`] — the latch, record content, and the external-collaborator
//!   trait surface (`Table`, `Record`, `MemAllocator`, `ScalableTimestamp`,
//!   `Logger`).
//! - [`occdb_concurrency`] — the access log and [`TransactionManager`].
//! - [`occdb_storage`] — thin reference implementations of the collaborator
//!   traits (`InMemoryTable`, `BytesRecord`, `HeapAllocator`, `AtomicClock`,
//!   `NullLogger`/`ChannelLogger`) enough to drive the core end to end.
//!
//! ## Quick start
//!
//! ```
//! use occdb::prelude::*;
//!
//! let table = InMemoryTable::<BytesRecord>::new(TableId(0));
//! let mut txn = TransactionManager::new(
//!     EngineConfig::default(),
//!     HeapAllocator,
//!     AtomicClock::new(),
//!     NullLogger,
//! );
//! let ctx = TxnContext::new(TxnType(0), ThreadId(0));
//!
//! txn.insert(ctx, &table, 1, BytesRecord::new(b"hello".to_vec()));
//! assert!(txn.commit(ctx, TxnParam::empty()));
//! ```

#![warn(missing_docs)]

pub mod prelude;

pub use occdb_concurrency::{Access, AccessId, AccessKind, AccessLog, AccessOutcome, SelectKind, TransactionManager};
pub use occdb_core::{
    CertifyGuard, CertifyWaitLock, CoreError, CoreResult, EngineConfig, Logger, MemAllocator,
    ReadGuard, Record, ScalableTimestamp, Table, TableId, TableRecord, ThreadId, TxnContext,
    TxnParam, TxnType, WriteGuard,
};
pub use occdb_storage::{AtomicClock, BytesRecord, ChannelLogger, HeapAllocator, InMemoryTable, LoggedEvent, NullLogger};

/// Installs a `tracing-subscriber` formatter reading its filter from
/// `RUST_LOG`, the way a binary-shaped consumer of this workspace's crates
/// would. This workspace ships no binary itself; this is a convenience for
/// callers embedding `occdb` in their own.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
