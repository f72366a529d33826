//! The `Record` trait: the opaque payload the concurrency core shuttles
//! around without ever inspecting its schema.

/// A record's payload, opaque to the concurrency core beyond the operations
/// it needs: visibility (for insert/delete), wholesale copy (for shadow
/// writeback), and size (for logging/allocation bookkeeping).
///
/// Implementors own their schema and raw bytes entirely on their side of
/// this trait.
pub trait Record: Clone + Send + Sync + 'static {
    /// Whether the record currently exists from the perspective of index
    /// traversal. Insert sets this `true` only at commit; delete sets it
    /// `false` at commit. The core never reads this field itself — visibility
    /// checks happen at index traversal, not in the core.
    fn is_visible(&self) -> bool;

    /// Sets the visibility bit. Called only while the record's Certify guard
    /// is held.
    fn set_visible(&mut self, visible: bool);

    /// Overwrites `self` with `other`'s contents in place. Used to publish a
    /// shadow's edits into a fresh payload at commit.
    fn copy_from(&mut self, other: &Self);

    /// Size in bytes, forwarded to loggers that need it.
    fn size(&self) -> usize;
}
