//! The Certify/Wait record latch.
//!
//! Three acquisition modes — Read, Write, Certify — with the write-then-
//! certify escalation rule enforced by consuming a [`WriteGuard`] token to
//! produce a [`CertifyGuard`], so a caller cannot reach Certify without
//! already holding Write: the type system enforces the escalation rule
//! rather than an ambient convention.
//!
//! Guards are plain consumable tokens rather than lifetime-borrowing RAII
//! guards: the transaction manager's access log holds one guard per logged
//! access across the whole multi-step commit sequence (validate →
//! write-back → release), stored next to an owned `Arc<TableRecord<_>>`
//! rather than a borrow of it. A lifetime-borrowing guard would make
//! `Access` self-referential; a token that the caller passes back into
//! `release_*`/`acquire_certify` keeps the data flow plain while still
//! making "acquire read", "acquire write", and "escalate to certify" the
//! only three ways to produce one.
//!
//! Each acquire method follows the same "spin on the wait predicate, then
//! re-check under the inner mutex, mutate-or-retry" shape. The predicate
//! check and the mutate both happen under the same inner-mutex critical
//! section in a single retry loop — the critical sections here are a
//! handful of instructions, so retrying through the lock directly costs
//! little, and there is no place state is read outside a synchronized
//! access.

use crate::spin::SpinMutex;

#[derive(Debug, Default)]
struct LatchState {
    reader_count: usize,
    is_writing: bool,
    is_certifying: bool,
}

/// A per-record latch with Read/Write/Certify modes.
///
/// Invariants:
/// - `is_certifying ⇒ reader_count == 0 && !is_writing`
/// - `is_writing` may coexist with `reader_count > 0`
/// - at most one thread holds Write or Certify at a time
#[derive(Debug, Default)]
pub struct CertifyWaitLock {
    state: SpinMutex<LatchState>,
}

impl CertifyWaitLock {
    /// Creates a new, unheld latch.
    pub const fn new() -> Self {
        Self {
            state: SpinMutex::new(LatchState {
                reader_count: 0,
                is_writing: false,
                is_certifying: false,
            }),
        }
    }

    /// Acquires Read mode: spins while a certifier holds the record.
    /// Readers and a single writer may coexist.
    pub fn acquire_read(&self) -> ReadGuard {
        loop {
            let acquired = self.state.with_locked(|s| {
                if !s.is_certifying {
                    s.reader_count += 1;
                    true
                } else {
                    false
                }
            });
            if acquired {
                return ReadGuard(());
            }
            std::hint::spin_loop();
        }
    }

    /// Releases Read mode. Releasing a mode not held is a program-logic bug
    /// and is caught by a debug assertion.
    pub fn release_read(&self, _guard: ReadGuard) {
        self.state.with_locked(|s| {
            debug_assert!(s.reader_count > 0, "release_read without a held read latch");
            s.reader_count -= 1;
        });
    }

    /// Acquires Write mode: spins while another writer or a certifier holds
    /// the record.
    pub fn acquire_write(&self) -> WriteGuard {
        loop {
            let acquired = self.state.with_locked(|s| {
                if !s.is_writing && !s.is_certifying {
                    s.is_writing = true;
                    true
                } else {
                    false
                }
            });
            if acquired {
                return WriteGuard(());
            }
            std::hint::spin_loop();
        }
    }

    /// Releases Write mode without certifying.
    pub fn release_write(&self, _guard: WriteGuard) {
        self.state.with_locked(|s| {
            debug_assert!(s.is_writing, "release_write without a held write latch");
            s.is_writing = false;
        });
    }

    /// Escalates Write to Certify: spins until all readers have drained,
    /// then atomically flips `is_writing = false, is_certifying = true`
    /// under the inner mutex, so no observer ever sees neither mode held.
    ///
    /// Takes a [`WriteGuard`] by value — the only way to obtain one is
    /// [`acquire_write`](Self::acquire_write), so the type system rules out
    /// certifying without first holding write.
    pub fn acquire_certify(&self, guard: WriteGuard) -> CertifyGuard {
        let WriteGuard(()) = guard;
        loop {
            let acquired = self.state.with_locked(|s| {
                if s.reader_count == 0 {
                    debug_assert!(s.is_writing, "certify escalation requires a held write latch");
                    s.is_writing = false;
                    s.is_certifying = true;
                    true
                } else {
                    false
                }
            });
            if acquired {
                return CertifyGuard(());
            }
            std::hint::spin_loop();
        }
    }

    /// Releases Certify mode.
    pub fn release_certify(&self, _guard: CertifyGuard) {
        self.state.with_locked(|s| {
            debug_assert!(s.is_certifying, "release_certify without a held certify latch");
            s.is_certifying = false;
        });
    }

    #[cfg(test)]
    fn snapshot(&self) -> (usize, bool, bool) {
        self.state
            .with_locked(|s| (s.reader_count, s.is_writing, s.is_certifying))
    }
}

/// Proof of held Read mode. Consumed by [`CertifyWaitLock::release_read`].
#[must_use = "a held latch must be released via the matching release_* call"]
pub struct ReadGuard(());

/// Proof of held Write mode. Consumed by [`CertifyWaitLock::release_write`]
/// or escalated via [`CertifyWaitLock::acquire_certify`].
#[must_use = "a held latch must be released (or escalated) via the matching call"]
pub struct WriteGuard(());

/// Proof of held Certify mode: exclusive of all readers and writers.
/// Consumed by [`CertifyWaitLock::release_certify`].
#[must_use = "a held latch must be released via the matching release_* call"]
pub struct CertifyGuard(());
