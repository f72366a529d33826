//! Identifiers and small value types shared across the concurrency core.

use std::fmt;

/// Identifies a table within the storage layer.
///
/// Opaque beyond equality/ordering — the core never inspects table identity,
/// it only uses it as part of the total record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableId(pub u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

/// Identifies the OS thread driving a `TransactionManager`.
///
/// One `TransactionManager` lives per thread; this id is carried into log
/// events purely for instrumentation and has no bearing on correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId(pub u32);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread#{}", self.0)
    }
}

/// Application-defined transaction kind, threaded through to the logger.
///
/// The core never branches on this value; it is opaque instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxnType(pub u32);

/// Context carried through every operation: which transaction, on which
/// thread. Carries no mutable state used by the core beyond identification.
#[derive(Debug, Clone, Copy)]
pub struct TxnContext {
    /// Application-defined transaction kind (e.g. "new-order", "payment").
    pub txn_type: TxnType,
    /// The OS thread this transaction is running on.
    pub thread_id: ThreadId,
}

impl TxnContext {
    /// Creates a new transaction context.
    pub fn new(txn_type: TxnType, thread_id: ThreadId) -> Self {
        Self { txn_type, thread_id }
    }
}

/// Opaque application parameters passed through to the command logger.
///
/// The core treats this as inert bytes; only a command-logging `Logger`
/// implementation interprets it.
#[derive(Debug, Clone)]
pub struct TxnParam(pub Vec<u8>);

impl TxnParam {
    /// Wraps an empty parameter, for transactions that log by value instead
    /// of by command.
    pub fn empty() -> Self {
        Self(Vec::new())
    }
}
