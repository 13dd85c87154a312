use std::ops::Range;

use tracing::debug;

/// Monotonic read/write counters over a fixed capacity
///
/// The counters never wrap on their own; the logical storage index is
/// `position % capacity`. Their difference is the amount of unread data, which
/// is what distinguishes a full buffer from an empty one.
#[derive(Debug, Clone)]
pub(crate) struct Positions {
    capacity: usize,
    rebase_threshold: usize,
    pub(crate) read_pos: usize,
    pub(crate) write_pos: usize,
}

impl Positions {
    pub(crate) fn new(capacity: usize, rebase_threshold: usize) -> Self {
        Self {
            capacity,
            rebase_threshold,
            read_pos: 0,
            write_pos: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Elements written but not yet consumed
    pub(crate) fn available_to_read(&self) -> usize {
        self.write_pos - self.read_pos
    }

    /// Free slots left for writers
    pub(crate) fn available_to_write(&self) -> usize {
        self.capacity - self.available_to_read()
    }

    /// Reduce both counters by a multiple of the capacity once the read
    /// position crosses the threshold
    ///
    /// Only valid while no transaction is open: open cursors are derived from
    /// the counters and would no longer line up.
    ///
    /// # Returns
    /// * `true` if the counters were moved
    pub(crate) fn rebase(&mut self) -> bool {
        if self.read_pos < self.rebase_threshold {
            return false;
        }

        let shift = self.read_pos / self.capacity * self.capacity;
        self.read_pos -= shift;
        self.write_pos -= shift;
        debug!(
            shift,
            read_pos = self.read_pos,
            write_pos = self.write_pos,
            "rebased ring buffer positions"
        );
        true
    }

    /// Storage ranges covered by `len` elements starting at `cursor`
    ///
    /// The first range runs from the cursor's offset towards the end of
    /// storage, the second (possibly empty) continues from index 0 when the
    /// span wraps.
    pub(crate) fn spans(&self, cursor: usize, len: usize) -> (Range<usize>, Range<usize>) {
        debug_assert!(len <= self.capacity);

        let offset = cursor % self.capacity;
        let head = (self.capacity - offset).min(len);
        (offset..offset + head, 0..len - head)
    }
}

/// Bookkeeping for one side's open transaction
#[derive(Debug, Default, Clone)]
pub(crate) struct Transfer {
    /// Next position to transfer at
    pub(crate) cursor: usize,
    /// Space (or data) available when the transaction began
    pub(crate) budget: usize,
    /// What is left of `budget`
    pub(crate) remaining: usize,
    /// Elements moved so far
    pub(crate) transferred: usize,
    pub(crate) active: bool,
}

impl Transfer {
    pub(crate) fn begin(&mut self, cursor: usize, budget: usize) {
        *self = Self {
            cursor,
            budget,
            remaining: budget,
            transferred: 0,
            active: true,
        };
    }

    /// Clamp a requested amount to the remaining budget
    pub(crate) fn clamp(&self, requested: usize) -> usize {
        requested.min(self.remaining)
    }

    pub(crate) fn advance(&mut self, len: usize) {
        self.cursor += len;
        self.remaining -= len;
        self.transferred += len;
    }

    /// Close the transaction, yielding the final cursor when anything moved
    pub(crate) fn finish(&mut self) -> Option<usize> {
        let moved = (self.transferred > 0).then_some(self.cursor);
        self.budget = 0;
        self.remaining = 0;
        self.transferred = 0;
        self.active = false;
        moved
    }
}
