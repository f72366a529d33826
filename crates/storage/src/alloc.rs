//! `HeapAllocator`: a trivial `MemAllocator` that allocates/frees shadow
//! copies as ordinary heap values.
//!
//! Thread-local pooling is a documented non-goal here — a production
//! deployment would plug in an arena or slab allocator behind the same
//! trait; this one exists so the concurrency core's tests don't need one.

use occdb_core::{MemAllocator, Record};

/// Allocates shadow copies via `Clone`, frees them via `Drop`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl<R: Record> MemAllocator<R> for HeapAllocator {
    fn alloc(&self, source: &R) -> Option<R> {
        Some(source.clone())
    }

    fn free(&self, _shadow: R) {
        // Dropping `_shadow` at the end of this call frees it.
    }
}
