//! Convenient imports for `occdb`.
//!
//! ```
//! use occdb::prelude::*;
//! ```

pub use crate::{
    init_logging, Access, AccessId, AccessKind, AccessLog, AccessOutcome, AtomicClock,
    BytesRecord, CertifyGuard, CertifyWaitLock, ChannelLogger, CoreError, CoreResult,
    EngineConfig, HeapAllocator, InMemoryTable, Logger, LoggedEvent, MemAllocator, ReadGuard,
    Record, ScalableTimestamp, SelectKind, Table, TableId, TableRecord, ThreadId,
    TransactionManager, TxnContext, TxnParam, TxnType, WriteGuard,
};
