//! Access entries and the per-transaction access log.
//!
//! The access log is thread-local: one `AccessLog` lives inside each
//! [`crate::manager::TransactionManager`], never shared across threads.

use std::sync::Arc;

use occdb_core::{CoreError, Record, TableId, TableRecord};

/// What a logged access intends to do to a record.
///
/// Ordered by acquisition strength for the coalescing rule in
/// [`AccessLog::append`]: `ReadOnly` acquires Read at commit; the other
/// three all acquire Write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Read-only touch; validated under Read mode at commit.
    ReadOnly,
    /// Read-modify-write touch via a shadow copy; validated under Write mode.
    ReadWrite,
    /// A brand-new record becoming visible at commit.
    InsertOnly,
    /// An existing record becoming invisible at commit.
    DeleteOnly,
}

impl AccessKind {
    /// Whether commit-time validation acquires Read (for `ReadOnly`) or
    /// Write (for everything else) mode on this access.
    pub fn acquires_write(self) -> bool {
        !matches!(self, AccessKind::ReadOnly)
    }
}

/// The subset of [`AccessKind`] a caller may request from
/// [`crate::manager::TransactionManager::select`]. `InsertOnly` is reached
/// only through
/// [`crate::manager::TransactionManager::insert`](crate::manager::TransactionManager::insert),
/// never through `select`, so it has no place in this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    /// See [`AccessKind::ReadOnly`].
    ReadOnly,
    /// See [`AccessKind::ReadWrite`].
    ReadWrite,
    /// See [`AccessKind::DeleteOnly`].
    DeleteOnly,
}

impl From<SelectKind> for AccessKind {
    fn from(kind: SelectKind) -> Self {
        match kind {
            SelectKind::ReadOnly => AccessKind::ReadOnly,
            SelectKind::ReadWrite => AccessKind::ReadWrite,
            SelectKind::DeleteOnly => AccessKind::DeleteOnly,
        }
    }
}

/// A caller-supplied correlation id for an access, threaded through from
/// `select`/`insert` to log events as an opaque slot id. The core never
/// interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessId(pub u32);

/// One logged touch of a record within a transaction.
pub struct Access<R: Record> {
    kind: AccessKind,
    record: Arc<TableRecord<R>>,
    shadow: Option<R>,
    snapshot_ts: u64,
    /// Whether commit validation compares `snapshot_ts` against the
    /// record's live timestamp (true for `ReadOnly` and `ReadWrite`).
    /// Tracked independent of `kind` so that coalescing a validated
    /// `ReadOnly` touch with a later `DeleteOnly`/`InsertOnly` touch of the
    /// same record does not silently drop validation — the merged entry
    /// still validates against each original access's snapshot even once
    /// its kind settles on something that wouldn't validate on its own.
    validates: bool,
}

impl<R: Record> Access<R> {
    /// Builds a new access. `shadow` must be `Some` iff `kind == ReadWrite`.
    pub fn new(kind: AccessKind, record: Arc<TableRecord<R>>, shadow: Option<R>, snapshot_ts: u64) -> Self {
        debug_assert_eq!(
            shadow.is_some(),
            kind == AccessKind::ReadWrite,
            "shadow must be present iff kind == ReadWrite"
        );
        let validates = matches!(kind, AccessKind::ReadOnly | AccessKind::ReadWrite);
        Self {
            kind,
            record,
            shadow,
            snapshot_ts,
            validates,
        }
    }

    /// Whether this access (possibly coalesced from several touches) must
    /// have its snapshot timestamp re-checked at commit validation.
    pub fn validates(&self) -> bool {
        self.validates
    }

    /// The kind of touch this access represents.
    pub fn kind(&self) -> AccessKind {
        self.kind
    }

    /// The record this access touched.
    pub fn record(&self) -> &Arc<TableRecord<R>> {
        &self.record
    }

    /// The table the touched record belongs to.
    pub fn table_id(&self) -> TableId {
        self.record.table_id()
    }

    /// The touched record's primary key.
    pub fn primary_key(&self) -> u64 {
        self.record.primary_key()
    }

    /// The timestamp observed when this access was first logged.
    pub fn snapshot_ts(&self) -> u64 {
        self.snapshot_ts
    }

    /// Borrows the shadow, if this is a `ReadWrite` access.
    pub fn shadow(&self) -> Option<&R> {
        self.shadow.as_ref()
    }

    /// Mutably borrows the shadow, for the caller to stage edits into
    /// before commit.
    pub fn shadow_mut(&mut self) -> Option<&mut R> {
        self.shadow.as_mut()
    }

    /// Takes ownership of the shadow, leaving `None` behind. Used both by
    /// commit write-back (the shadow becomes the new live payload) and by
    /// abort cleanup (the shadow is freed unpublished).
    pub fn take_shadow(&mut self) -> Option<R> {
        self.shadow.take()
    }

    /// The deterministic total order key this access sorts by: the table
    /// and primary key of the touched record. Every thread that logs an
    /// access to the same record computes the same key, which is what lets
    /// commit acquire latches in a single process-wide order and remain
    /// deadlock-free.
    fn order_key(&self) -> (TableId, u64) {
        self.record.order_key()
    }

    /// Escalates this access's kind to `other` if `other` is strictly
    /// stronger, keeping the first-touch snapshot timestamp. Used to
    /// coalesce repeat accesses to the same record.
    fn coalesce(&mut self, other: Access<R>) {
        if self.kind == AccessKind::ReadOnly && other.kind != AccessKind::ReadOnly {
            self.kind = other.kind;
        }
        self.validates |= other.validates;
        if self.shadow.is_none() {
            self.shadow = other.shadow;
        }
    }
}

/// An unbounded-until-commit, bounded-at-runtime per-transaction journal of
/// record accesses.
///
/// The capacity is a construction-time parameter rather than a compile-time
/// constant, so tests can exercise the overflow boundary cheaply.
pub struct AccessLog<R: Record> {
    entries: Vec<Access<R>>,
    capacity: usize,
}

impl<R: Record> AccessLog<R> {
    /// Creates an empty log bounded at `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Appends `access`, or coalesces it into an existing entry for the same
    /// record (same `(table_id, primary_key)`) if one is already logged.
    ///
    /// Returns the index of the (possibly pre-existing) entry. Fails with
    /// [`CoreError::CapacityExceeded`] — returning `access` back to the
    /// caller so shadow bytes already allocated for it can be freed — if a
    /// genuinely new entry would push the log past `capacity` — overflow is
    /// a configuration error, not a condition the core tries to recover
    /// from gracefully.
    pub fn append(&mut self, access: Access<R>) -> Result<usize, (Access<R>, CoreError)> {
        if let Some((i, existing)) = self
            .entries
            .iter_mut()
            .enumerate()
            .find(|(_, e)| e.order_key() == access.order_key())
        {
            existing.coalesce(access);
            return Ok(i);
        }
        if self.entries.len() >= self.capacity {
            return Err((
                access,
                CoreError::CapacityExceeded {
                    attempted: self.entries.len() + 1,
                    limit: self.capacity,
                },
            ));
        }
        self.entries.push(access);
        Ok(self.entries.len() - 1)
    }

    /// Sorts entries by the deterministic total record order. Stable, so
    /// ties (none should exist post-coalescing) keep their relative append
    /// order.
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|a| a.order_key());
    }

    /// Borrows the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Access<R>> {
        self.entries.get(index)
    }

    /// Mutably borrows the entry at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Access<R>> {
        self.entries.get_mut(index)
    }

    /// Number of logged accesses.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no accesses.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries. Does NOT free shadow bytes — the transaction
    /// manager owns shadow lifetime and must free any unpublished shadow
    /// before calling this.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// This log's configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The outcome of a `select` or `insert` touch.
pub enum AccessOutcome<R: Record> {
    /// `ReadOnly`/`DeleteOnly`: the live payload observed at snapshot time.
    Snapshot(Arc<R>),
    /// `ReadWrite`: stage edits via the returned record handle (resolve with
    /// [`crate::manager::TransactionManager::shadow_mut`]).
    Shadow(Arc<TableRecord<R>>),
    /// The access was not recorded: either the log was at capacity or
    /// shadow allocation failed. Either is fatal to the transaction; the
    /// caller should abort it.
    Rejected,
}
