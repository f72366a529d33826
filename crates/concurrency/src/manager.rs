//! The optimistic-concurrency transaction manager: `insert`, `select`, `commit`.
//!
//! One manager lives per thread, with its own thread-local [`AccessLog`].
//! Validation, write-back, and release all acquire latches in the access
//! log's sorted total order, which is what makes concurrent commits
//! deadlock-free: every thread that touches the same two records acquires
//! them in the same order, so no cycle of waiters can form.
//!
//! On validation failure, only the prefix of accesses actually latched so
//! far gets released — tracked explicitly as a `Vec<HeldGuard>` rather than
//! counted down from a total, so the release loop can never under- or
//! over-release relative to what was really acquired.

use std::sync::Arc;

use occdb_core::{
    CertifyGuard, EngineConfig, Logger, MemAllocator, Record, ReadGuard, ScalableTimestamp, Table,
    TableId, TableRecord, TxnContext, TxnParam, WriteGuard,
};

use crate::access::{Access, AccessId, AccessKind, AccessLog, AccessOutcome, SelectKind};

/// A latch guard held by one in-flight access during commit. Starts as
/// `Read` or `Write` from validation; `Write` entries escalate to `Certify`
/// during write-back.
enum HeldGuard {
    Read(ReadGuard),
    Write(WriteGuard),
    Certify(CertifyGuard),
}

/// Drives Insert/Select/Commit against a shared table of latched records.
///
/// `R` is the opaque record payload type; `A`, `C`, `L` are the
/// collaborators this manager is generic over (shadow allocator, timestamp
/// oracle, write-ahead logger). `Table` implementations are supplied per
/// call rather than stored, since a single transaction may touch more than
/// one table.
pub struct TransactionManager<R, A, C, L>
where
    R: Record,
    A: MemAllocator<R>,
    C: ScalableTimestamp,
    L: Logger<R>,
{
    allocator: A,
    clock: C,
    logger: L,
    config: EngineConfig,
    access_log: AccessLog<R>,
}

impl<R, A, C, L> TransactionManager<R, A, C, L>
where
    R: Record,
    A: MemAllocator<R>,
    C: ScalableTimestamp,
    L: Logger<R>,
{
    /// Builds a manager with its own thread-local access log bounded at
    /// `config.max_access_log_len` entries.
    pub fn new(config: EngineConfig, allocator: A, clock: C, logger: L) -> Self {
        Self {
            allocator,
            clock,
            logger,
            access_log: AccessLog::new(config.max_access_log_len),
            config,
        }
    }

    /// This manager's configuration.
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Number of accesses currently logged for the in-flight transaction.
    pub fn access_count(&self) -> usize {
        self.access_log.count()
    }

    /// Inserts `new_record` at `primary_key` in `table`.
    ///
    /// Marks `new_record` invisible, upserts it into `table` under the
    /// table's own concurrency discipline, and logs an `InsertOnly` access.
    /// No validation timestamp is recorded — insert has nothing to compare
    /// against at commit. Returns `false` only if the access log is already
    /// at capacity.
    pub fn insert<T: Table<R>>(
        &mut self,
        _ctx: TxnContext,
        table: &T,
        primary_key: u64,
        mut new_record: R,
    ) -> bool {
        new_record.set_visible(false);
        let stored = table.insert(
            primary_key,
            TableRecord::new(table.table_id(), primary_key, new_record, 0),
        );
        match self
            .access_log
            .append(Access::new(AccessKind::InsertOnly, stored, None, 0))
        {
            Ok(_) => true,
            Err((_, err)) => {
                tracing::warn!(error = %err, "insert access log append failed");
                false
            }
        }
    }

    /// Reads, marks-for-delete, or stages a write on an already-resolved
    /// record, logging the corresponding access.
    ///
    /// `record_ref` is the already-resolved record handle; index traversal
    /// and visibility checks are the caller's/table's concern — this
    /// manager never walks an index or inspects visibility itself.
    /// `access_id` and `is_key_access` are opaque instrumentation, threaded
    /// through unchanged.
    pub fn select(
        &mut self,
        _ctx: TxnContext,
        _table_id: TableId,
        record_ref: Arc<TableRecord<R>>,
        kind: SelectKind,
        _access_id: AccessId,
        _is_key_access: bool,
    ) -> (bool, AccessOutcome<R>) {
        match kind {
            SelectKind::ReadOnly => {
                let ts = record_ref.content().get_timestamp();
                let payload = record_ref.content().snapshot();
                match self
                    .access_log
                    .append(Access::new(AccessKind::ReadOnly, record_ref, None, ts))
                {
                    Ok(_) => (true, AccessOutcome::Snapshot(payload)),
                    Err((_, err)) => {
                        tracing::warn!(error = %err, "read-only access log append failed");
                        (false, AccessOutcome::Rejected)
                    }
                }
            }
            SelectKind::DeleteOnly => {
                let ts = record_ref.content().get_timestamp();
                let payload = record_ref.content().snapshot();
                match self
                    .access_log
                    .append(Access::new(AccessKind::DeleteOnly, record_ref, None, ts))
                {
                    Ok(_) => (true, AccessOutcome::Snapshot(payload)),
                    Err((_, err)) => {
                        tracing::warn!(error = %err, "delete-only access log append failed");
                        (false, AccessOutcome::Rejected)
                    }
                }
            }
            SelectKind::ReadWrite => {
                // Timestamp-first, then a load-load fence, then copy the
                // live payload: this ordering is what lets validation detect
                // a concurrent writer that slipped in between snapshot and
                // commit.
                let (ts, live) = record_ref.content().snapshot_with_timestamp();
                match self.allocator.alloc(&live) {
                    Some(shadow) => {
                        let handle = Arc::clone(&record_ref);
                        match self
                            .access_log
                            .append(Access::new(AccessKind::ReadWrite, record_ref, Some(shadow), ts))
                        {
                            Ok(_) => (true, AccessOutcome::Shadow(handle)),
                            Err((mut access, err)) => {
                                tracing::warn!(error = %err, "read-write access log append failed");
                                if let Some(shadow) = access.take_shadow() {
                                    self.allocator.free(shadow);
                                }
                                (false, AccessOutcome::Rejected)
                            }
                        }
                    }
                    None => {
                        tracing::warn!(table_id = %_table_id, "shadow allocation failed");
                        (false, AccessOutcome::Rejected)
                    }
                }
            }
        }
    }

    /// Resolves the staged shadow for a prior `ReadWrite` [`select`], so the
    /// caller can mutate it in place before commit.
    pub fn shadow_mut(&mut self, record: &Arc<TableRecord<R>>) -> Option<&mut R> {
        let key = record.order_key();
        (0..self.access_log.count())
            .find(|&i| self.access_log.get(i).map(|a| a.record().order_key()) == Some(key))
            .and_then(move |i| self.access_log.get_mut(i))
            .and_then(Access::shadow_mut)
    }

    /// Validates and, if successful, publishes every access logged since the
    /// last commit; returns whether the transaction committed.
    ///
    /// Sorts the access log into the deterministic total record order,
    /// validates under Read/Write latches, and — only if every snapshot
    /// timestamp still matches — escalates to Certify to publish writes,
    /// emits log events, and releases. On validation failure, releases
    /// exactly the prefix of accesses that were actually latched and
    /// returns `false`. Always clears the access log before returning,
    /// freeing any shadow that was never published.
    pub fn commit(&mut self, ctx: TxnContext, param: TxnParam) -> bool {
        self.access_log.sort();
        let n = self.access_log.count();

        let mut held: Vec<HeldGuard> = Vec::with_capacity(n);
        let mut success = true;
        let mut max_rw_ts: u64 = 0;

        for i in 0..n {
            let access = self.access_log.get(i).expect("index within sorted log");
            if access.kind().acquires_write() {
                let guard = access.record().content().acquire_write();
                if access.validates() {
                    let ts = access.record().content().get_timestamp();
                    if ts != access.snapshot_ts() {
                        held.push(HeldGuard::Write(guard));
                        success = false;
                        break;
                    }
                    max_rw_ts = max_rw_ts.max(access.snapshot_ts());
                }
                held.push(HeldGuard::Write(guard));
            } else {
                let guard = access.record().content().acquire_read();
                if access.validates() {
                    let ts = access.record().content().get_timestamp();
                    if ts != access.snapshot_ts() {
                        held.push(HeldGuard::Read(guard));
                        success = false;
                        break;
                    }
                    max_rw_ts = max_rw_ts.max(access.snapshot_ts());
                }
                held.push(HeldGuard::Read(guard));
            }
        }

        if !success {
            tracing::debug!(
                thread = %ctx.thread_id,
                locks_held = held.len(),
                "commit validation failed, releasing acquired prefix"
            );
            for (i, guard) in held.into_iter().enumerate() {
                let access = self.access_log.get(i).expect("index within sorted log");
                match guard {
                    HeldGuard::Read(g) => access.record().content().release_read(g),
                    HeldGuard::Write(g) => access.record().content().release_write(g),
                    HeldGuard::Certify(_) => unreachable!("validation never escalates to certify"),
                }
            }
            self.cleanup_access_log();
            return false;
        }

        let global_ts = self.clock.get_timestamp();
        let commit_ts = self
            .clock
            .generate_commit_ts(global_ts, max_rw_ts.saturating_add(self.config.commit_ts_slack));
        debug_assert!(
            commit_ts > max_rw_ts,
            "generate_commit_ts violated its load-bearing contract"
        );

        let mut escalated: Vec<HeldGuard> = Vec::with_capacity(n);
        for (i, guard) in held.into_iter().enumerate() {
            match guard {
                HeldGuard::Read(g) => escalated.push(HeldGuard::Read(g)),
                HeldGuard::Write(w) => {
                    let access = self.access_log.get_mut(i).expect("index within sorted log");
                    let certify = access.record().content().acquire_certify(w);
                    match access.kind() {
                        AccessKind::ReadWrite => {
                            let shadow = access.take_shadow().expect("ReadWrite access carries a shadow");
                            self.logger.update_record(ctx.thread_id, access.table_id(), &shadow);
                            access.record().content().publish(&certify, shadow, commit_ts);
                        }
                        AccessKind::InsertOnly => {
                            let mut payload = (*access.record().content().snapshot()).clone();
                            payload.set_visible(true);
                            self.logger.insert_record(ctx.thread_id, access.table_id(), &payload);
                            access.record().content().publish(&certify, payload, commit_ts);
                        }
                        AccessKind::DeleteOnly => {
                            let mut payload = (*access.record().content().snapshot()).clone();
                            payload.set_visible(false);
                            self.logger.delete_record(
                                ctx.thread_id,
                                access.table_id(),
                                access.primary_key(),
                            );
                            access.record().content().publish(&certify, payload, commit_ts);
                        }
                        AccessKind::ReadOnly => unreachable!("ReadOnly never acquires write"),
                    }
                    escalated.push(HeldGuard::Certify(certify));
                }
                HeldGuard::Certify(_) => unreachable!("no access holds certify before writeback"),
            }
        }

        self.logger
            .commit_transaction(ctx.thread_id, global_ts, ctx.txn_type, &param);

        for (i, guard) in escalated.into_iter().enumerate() {
            let access = self.access_log.get(i).expect("index within sorted log");
            match guard {
                HeldGuard::Read(g) => access.record().content().release_read(g),
                HeldGuard::Certify(g) => access.record().content().release_certify(g),
                HeldGuard::Write(_) => unreachable!("writeback always escalates to certify"),
            }
        }

        self.cleanup_access_log();
        true
    }

    /// `abort` has no mid-flight meaning under optimistic concurrency
    /// control: a manager never holds a latch outside of `commit`'s own
    /// call stack, so there is nothing to roll back. Calling this is a
    /// caller error.
    pub fn abort(&self) -> ! {
        panic!("abort is not supported mid-transaction under optimistic concurrency control");
    }

    /// Frees any shadow left un-taken (i.e. never published) and clears the
    /// log, ready for the next transaction on this thread.
    fn cleanup_access_log(&mut self) {
        for i in 0..self.access_log.count() {
            if let Some(access) = self.access_log.get_mut(i) {
                if let Some(shadow) = access.take_shadow() {
                    self.allocator.free(shadow);
                }
            }
        }
        self.access_log.clear();
        debug_assert!(self.access_log.count() <= self.access_log.capacity());
    }
}
