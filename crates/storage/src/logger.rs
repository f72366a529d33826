//! `NullLogger` and `ChannelLogger`: a no-op `Logger` and one that forwards
//! every call over a channel so tests can assert on emitted events.

use std::sync::mpsc;

use occdb_core::{Logger, Record, TableId, ThreadId, TxnParam, TxnType};

/// A `Logger` that does nothing. The default collaborator for callers that
/// don't need durability at all (benchmarks, scratch tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl<R: Record> Logger<R> for NullLogger {}

/// One event forwarded by [`ChannelLogger`], in the order it was emitted.
#[derive(Debug, Clone)]
pub enum LoggedEvent<R> {
    /// A `ReadWrite` access published its shadow.
    Update {
        /// Thread that committed the write.
        thread: ThreadId,
        /// Table the written record belongs to.
        table_id: TableId,
        /// The record's new value.
        value: R,
    },
    /// An `InsertOnly` access became visible.
    Insert {
        /// Thread that committed the insert.
        thread: ThreadId,
        /// Table the inserted record belongs to.
        table_id: TableId,
        /// The inserted record's value.
        value: R,
    },
    /// A `DeleteOnly` access became invisible.
    Delete {
        /// Thread that committed the delete.
        thread: ThreadId,
        /// Table the deleted record belonged to.
        table_id: TableId,
        /// The deleted record's primary key.
        primary_key: u64,
    },
    /// The transaction committed as a whole.
    Commit {
        /// Thread that committed the transaction.
        thread: ThreadId,
        /// The global timestamp observed at commit.
        global_ts: u64,
        /// Application-defined transaction kind.
        txn_type: TxnType,
        /// Opaque command-log parameter.
        param: TxnParam,
    },
}

/// A `Logger` that forwards every call over an `std::sync::mpsc` channel, as
/// a fire-and-forget value/command logger: `send` failures (the receiver
/// dropped) are swallowed, since the commit path never surfaces logging
/// errors.
pub struct ChannelLogger<R> {
    sender: mpsc::Sender<LoggedEvent<R>>,
}

impl<R> ChannelLogger<R> {
    /// Builds a connected sender/receiver pair.
    pub fn new() -> (Self, mpsc::Receiver<LoggedEvent<R>>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl<R: Record> Logger<R> for ChannelLogger<R> {
    fn update_record(&self, thread: ThreadId, table_id: TableId, new_value: &R) {
        let _ = self.sender.send(LoggedEvent::Update {
            thread,
            table_id,
            value: new_value.clone(),
        });
    }

    fn insert_record(&self, thread: ThreadId, table_id: TableId, new_value: &R) {
        let _ = self.sender.send(LoggedEvent::Insert {
            thread,
            table_id,
            value: new_value.clone(),
        });
    }

    fn delete_record(&self, thread: ThreadId, table_id: TableId, primary_key: u64) {
        let _ = self.sender.send(LoggedEvent::Delete {
            thread,
            table_id,
            primary_key,
        });
    }

    fn commit_transaction(&self, thread: ThreadId, global_ts: u64, txn_type: TxnType, param: &TxnParam) {
        let _ = self.sender.send(LoggedEvent::Commit {
            thread,
            global_ts,
            txn_type,
            param: param.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Counter(u64, bool);

    impl Record for Counter {
        fn is_visible(&self) -> bool {
            self.1
        }
        fn set_visible(&mut self, visible: bool) {
            self.1 = visible;
        }
        fn copy_from(&mut self, other: &Self) {
            *self = other.clone();
        }
        fn size(&self) -> usize {
            std::mem::size_of::<Self>()
        }
    }

    #[test]
    fn channel_logger_forwards_update_events() {
        let (logger, rx) = ChannelLogger::<Counter>::new();
        logger.update_record(ThreadId(1), TableId(0), &Counter(9, true));
        match rx.recv().unwrap() {
            LoggedEvent::Update { thread, table_id, value } => {
                assert_eq!(thread, ThreadId(1));
                assert_eq!(table_id, TableId(0));
                assert_eq!(value.0, 9);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
