//! Tables: the record-identity namespace the access log orders over with a
//! deterministic total order.

use std::sync::Arc;

use crate::content::RecordContent;
use crate::record::Record;
use crate::types::TableId;

/// A single stored record: its table membership, primary key, and content.
///
/// `TableRecord` is the unit the transaction manager actually latches.
/// It is always handled behind an `Arc` so that an `Access` entry can hold
/// one independent of the table's own lifetime: an access log entry must
/// outlive a single `select`/`insert` call and survive until `commit`.
pub struct TableRecord<R: Record> {
    table_id: TableId,
    primary_key: u64,
    content: RecordContent<R>,
}

impl<R: Record> TableRecord<R> {
    /// Wraps `initial` as a new record identified by `(table_id, primary_key)`.
    pub fn new(table_id: TableId, primary_key: u64, initial: R, timestamp: u64) -> Self {
        Self {
            table_id,
            primary_key,
            content: RecordContent::new(initial, timestamp),
        }
    }

    /// The table this record belongs to.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// The record's primary key within its table.
    pub fn primary_key(&self) -> u64 {
        self.primary_key
    }

    /// The record's latch, timestamp, and payload.
    pub fn content(&self) -> &RecordContent<R> {
        &self.content
    }

    /// The key the access log's total order sorts by: table first, then
    /// primary key, so every thread visits records in the same sequence
    /// regardless of the order accesses were logged in.
    pub fn order_key(&self) -> (TableId, u64) {
        (self.table_id, self.primary_key)
    }
}

/// A table's storage surface: point lookup and insertion of new records.
///
/// Implementors own however they index records by primary key (a hash map, a
/// B-tree, a sharded map); the concurrency core only ever calls through this
/// trait, never reaches into the index directly, keeping the latch and
/// transaction manager schema- and index-agnostic.
pub trait Table<R: Record>: Send + Sync {
    /// Looks up a record by primary key.
    fn get(&self, primary_key: u64) -> Option<Arc<TableRecord<R>>>;

    /// Inserts a new record at `primary_key`, returning the stored handle.
    /// Callers are responsible for the record being invisible
    /// (`Record::is_visible() == false`) until commit publishes it.
    fn insert(&self, primary_key: u64, record: TableRecord<R>) -> Arc<TableRecord<R>>;

    /// This table's identity.
    fn table_id(&self) -> TableId;
}

impl<R: Record, T: Table<R> + ?Sized> Table<R> for Arc<T> {
    fn get(&self, primary_key: u64) -> Option<Arc<TableRecord<R>>> {
        (**self).get(primary_key)
    }

    fn insert(&self, primary_key: u64, record: TableRecord<R>) -> Arc<TableRecord<R>> {
        (**self).insert(primary_key, record)
    }

    fn table_id(&self) -> TableId {
        (**self).table_id()
    }
}
