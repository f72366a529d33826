//! Record content: the per-record latch paired with a timestamp and payload.
//!
//! A raw pointer swapped only while holding Certify, dereferenced
//! unsynchronized by readers outside any lock, is a data race under Rust's
//! memory model even when every access respects the latch discipline, so
//! the payload here lives behind `parking_lot::RwLock<Arc<R>>`: a certifier
//! still swaps the whole payload in one step (`publish`), but every reader
//! gets a safe, non-torn `Arc` clone instead of a bare pointer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::latch::{CertifyGuard, CertifyWaitLock, ReadGuard, WriteGuard};
use crate::record::Record;

/// `(latch, timestamp, payload)` for a single record.
pub struct RecordContent<R: Record> {
    latch: CertifyWaitLock,
    timestamp: AtomicU64,
    payload: RwLock<Arc<R>>,
}

impl<R: Record> RecordContent<R> {
    /// Wraps `initial` with a starting timestamp, unlatched.
    pub fn new(initial: R, timestamp: u64) -> Self {
        Self {
            latch: CertifyWaitLock::new(),
            timestamp: AtomicU64::new(timestamp),
            payload: RwLock::new(Arc::new(initial)),
        }
    }

    /// Reads the record's timestamp. This is an Acquire load, pairing with
    /// the Release store in [`publish`](Self::publish).
    pub fn get_timestamp(&self) -> u64 {
        self.timestamp.load(Ordering::Acquire)
    }

    /// Clones the current payload `Arc` without acquiring the latch. Safe to
    /// call at any time: `RwLock` guarantees the clone is never torn, though
    /// it may race a concurrent `publish` and return either the old or new
    /// payload — which is why `ReadWrite` accesses pair this with
    /// [`snapshot_with_timestamp`](Self::snapshot_with_timestamp) and
    /// re-validate the timestamp at commit.
    pub fn snapshot(&self) -> Arc<R> {
        self.payload.read().clone()
    }

    /// Captures `(timestamp, payload)` with an explicit load-load fence
    /// between them, matching the "read timestamp, fence, read payload"
    /// snapshot sequence even though the `Acquire` load above already
    /// orders subsequent loads on this thread.
    pub fn snapshot_with_timestamp(&self) -> (u64, Arc<R>) {
        let ts = self.get_timestamp();
        std::sync::atomic::fence(Ordering::Acquire);
        (ts, self.snapshot())
    }

    /// Acquires Read mode.
    pub fn acquire_read(&self) -> ReadGuard {
        self.latch.acquire_read()
    }

    /// Releases Read mode.
    pub fn release_read(&self, guard: ReadGuard) {
        self.latch.release_read(guard)
    }

    /// Acquires Write mode.
    pub fn acquire_write(&self) -> WriteGuard {
        self.latch.acquire_write()
    }

    /// Releases Write mode without certifying.
    pub fn release_write(&self, guard: WriteGuard) {
        self.latch.release_write(guard)
    }

    /// Escalates a held Write guard to Certify.
    pub fn acquire_certify(&self, guard: WriteGuard) -> CertifyGuard {
        self.latch.acquire_certify(guard)
    }

    /// Releases Certify mode.
    pub fn release_certify(&self, guard: CertifyGuard) {
        self.latch.release_certify(guard)
    }

    /// Publishes `new_payload` and `commit_ts` while holding Certify.
    ///
    /// The payload swap happens first, a `Release` fence orders it before
    /// the timestamp store, and the timestamp store is itself `Release` so
    /// any thread that later `Acquire`-loads this timestamp is guaranteed to
    /// see the new payload, not a stale one.
    ///
    /// Takes `_certify` by reference rather than by value: publishing must
    /// not release the latch, since every held latch is released together
    /// in a later step. Borrowing the guard proves Certify is held here
    /// without consuming it.
    pub fn publish(&self, _certify: &CertifyGuard, new_payload: R, commit_ts: u64) {
        *self.payload.write() = Arc::new(new_payload);
        std::sync::atomic::fence(Ordering::Release);
        self.timestamp.store(commit_ts, Ordering::Release);
    }
}
