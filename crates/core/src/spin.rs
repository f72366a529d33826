//! A minimal busy-spin mutex.
//!
//! `CertifyWaitLock`'s inner critical sections touch three plain fields for
//! a handful of instructions. A park-capable lock would satisfy correctness
//! but adds a blocking syscall to what must stay a pure spin-wait hot path,
//! so the inner mutex is a hand-rolled test-and-test-and-set spinlock
//! rather than `parking_lot`.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// A spinlock-protected value with no OS-level parking.
pub struct SpinMutex<T> {
    locked: AtomicBool,
    value: UnsafeCell<T>,
}

// SAFETY: `locked` admits at most one thread into the critical section at a
// time, so `&mut T` is never aliased. `T: Send` is required because the
// guard may be dropped (freeing/mutating `T`) on a different thread than
// the one that acquired it.
unsafe impl<T: Send> Sync for SpinMutex<T> {}

impl<T> SpinMutex<T> {
    /// Creates a new spin mutex wrapping `value`.
    pub const fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Spins until the lock is acquired, then runs `f` with exclusive access.
    ///
    /// This is the only way to touch the inner value — there is no long-lived
    /// guard type, because `CertifyWaitLock` only ever needs a
    /// read-recheck-mutate-or-retry sequence, never a guard held across a
    /// spin loop.
    #[inline]
    pub fn with_locked<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                std::hint::spin_loop();
            }
        }
        // SAFETY: we hold the lock exclusively until `unlock` below.
        let result = f(unsafe { &mut *self.value.get() });
        self.locked.store(false, Ordering::Release);
        result
    }
}
