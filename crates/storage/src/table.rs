//! `InMemoryTable`: a `DashMap`-backed primary-key index implementing
//! `Table`.
//!
//! Lock-free reads, per-key-sharded writes: `DashMap` does the
//! thread-safety, this type just owns the upsert semantics on top of it. A
//! single table has one flat primary-key namespace, with no secondary
//! partition key.

use std::sync::Arc;

use dashmap::DashMap;

use occdb_core::{Record, Table, TableId, TableRecord};

/// A thread-safe, `DashMap`-backed table of records keyed by primary key.
pub struct InMemoryTable<R: Record> {
    table_id: TableId,
    rows: DashMap<u64, Arc<TableRecord<R>>>,
}

impl<R: Record> InMemoryTable<R> {
    /// Creates an empty table identified by `table_id`.
    pub fn new(table_id: TableId) -> Self {
        Self {
            table_id,
            rows: DashMap::new(),
        }
    }

    /// Number of rows currently stored, visible or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Record> Table<R> for InMemoryTable<R> {
    fn get(&self, primary_key: u64) -> Option<Arc<TableRecord<R>>> {
        self.rows.get(&primary_key).map(|entry| Arc::clone(entry.value()))
    }

    fn insert(&self, primary_key: u64, record: TableRecord<R>) -> Arc<TableRecord<R>> {
        let stored = Arc::new(record);
        let replaced = self.rows.insert(primary_key, Arc::clone(&stored));
        if replaced.is_some() {
            tracing::debug!(table_id = %self.table_id, primary_key, "insert replaced an existing row");
        }
        stored
    }

    fn table_id(&self) -> TableId {
        self.table_id
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
    fn insert_then_get_round_trips() {
        let table = InMemoryTable::<Counter>::new(TableId(0));
        let row = TableRecord::new(TableId(0), 7, Counter(1, true), 0);
        table.insert(7, row);

        let found = table.get(7).unwrap();
        assert_eq!(found.primary_key(), 7);
        assert_eq!(found.content().snapshot().0, 1);
    }

    #[test]
    fn get_missing_key_returns_none() {
        let table = InMemoryTable::<Counter>::new(TableId(0));
        assert!(table.get(404).is_none());
    }

    #[test]
    fn insert_upserts_existing_key() {
        let table = InMemoryTable::<Counter>::new(TableId(0));
        table.insert(1, TableRecord::new(TableId(0), 1, Counter(1, true), 0));
        table.insert(1, TableRecord::new(TableId(0), 1, Counter(2, true), 0));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1).unwrap().content().snapshot().0, 2);
    }
}
