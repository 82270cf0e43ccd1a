//! Bounded preview buffer for streamed rows.

use crate::config::DEFAULT_PREVIEW_CAPACITY;
use crate::models::Record;

/// Size-capped, append-only buffer holding the first rows of a stream.
///
/// Capacity is fixed at construction. Rows past capacity are counted but not
/// stored; nothing is ever truncated from the front. One writer only: the
/// session's event consumer. There is no locking because there is no
/// concurrent access to defend against.
#[derive(Debug)]
pub struct PreviewAggregator {
    capacity: usize,
    rows: Vec<Record>,
    seen: u64,
}

impl PreviewAggregator {
    /// Create a buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity, rows: Vec::with_capacity(capacity), seen: 0 }
    }

    /// Accept a batch of rows, keeping those that fit under capacity.
    ///
    /// Overflow is not an error; extra rows still count toward [`seen`].
    ///
    /// [`seen`]: PreviewAggregator::seen
    pub fn accept(&mut self, rows: &[Record]) {
        self.seen += rows.len() as u64;
        if self.rows.len() >= self.capacity {
            return;
        }
        let room = self.capacity - self.rows.len();
        self.rows.extend(rows.iter().take(room).cloned());
    }

    /// Rows retained, in stream order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Consume the buffer, yielding the retained rows.
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    /// Column order: the first retained record's key order.
    pub fn columns(&self) -> Vec<String> {
        self.rows.first().map(|r| r.keys().cloned().collect()).unwrap_or_default()
    }

    /// Number of rows retained.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether no rows were retained.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether the buffer is at capacity.
    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.capacity
    }

    /// Total rows observed, including those not retained.
    pub fn seen(&self) -> u64 {
        self.seen
    }
}

impl Default for PreviewAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_CAPACITY)
    }
}
