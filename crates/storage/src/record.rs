//! `BytesRecord`: a `Vec<u8>`-backed `Record`, standing in for a full
//! schema-aware record type.

use occdb_core::Record;

/// A record whose payload is an opaque byte buffer plus a visibility bit.
///
/// The concurrency core never inspects `data`; it only calls `copy_from`
/// (to publish a shadow's edits) and `size` (for logging/allocation
/// bookkeeping), exactly as the `Record` trait's contract requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesRecord {
    data: Vec<u8>,
    visible: bool,
}

impl BytesRecord {
    /// Builds a new record from `data`, initially visible.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            visible: true,
        }
    }

    /// Borrows the payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replaces the payload bytes in place.
    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }
}

impl Record for BytesRecord {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn copy_from(&mut self, other: &Self) {
        self.data.clear();
        self.data.extend_from_slice(&other.data);
        self.visible = other.visible;
    }

    fn size(&self) -> usize {
        self.data.len()
    }
}
