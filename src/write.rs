use tracing::trace;

use crate::error::{Result, RingBufferError};
use crate::ring_buffer::Locked;

impl<T: Copy> Locked<'_, T> {
    /// Open a write transaction
    ///
    /// Snapshots the free space as the transaction's budget. Positions are
    /// re-based first when no other transaction is open.
    ///
    /// # Returns
    /// * the budget; 0 means there is no room
    pub fn write_start(&mut self) -> usize {
        let state = &mut *self.state;
        state.rebase_if_idle();

        let budget = state.positions.available_to_write();
        state.write.begin(state.positions.write_pos, budget);
        trace!(budget, write_pos = state.positions.write_pos, "write transaction opened");
        budget
    }

    /// Copy `data` into the buffer at the transaction's cursor
    ///
    /// Copies at most the remaining budget; anything beyond it is silently
    /// dropped. Data is not visible to readers until [`write_end`](Self::write_end).
    ///
    /// # Returns
    /// * `Ok(n)` with the number of elements copied
    /// * `Err(RingBufferError::InvalidArgument)` if `data` is empty
    pub fn write(&mut self, data: &[T]) -> Result<usize> {
        if data.is_empty() {
            return Err(RingBufferError::InvalidArgument);
        }

        let state = &mut *self.state;
        let len = state.write.clamp(data.len());
        if len == 0 {
            return Ok(0);
        }

        let (head, tail) = state.positions.spans(state.write.cursor, len);
        let split = head.len();
        state.storage[head].copy_from_slice(&data[..split]);
        state.storage[tail].copy_from_slice(&data[split..len]);
        state.write.advance(len);
        Ok(len)
    }

    /// Commit the write transaction, publishing everything written in it
    ///
    /// An empty transaction leaves the write position untouched.
    ///
    /// # Returns
    /// * the number of elements committed
    pub fn write_end(&mut self) -> usize {
        let state = &mut *self.state;
        let committed = state.write.transferred;
        if let Some(cursor) = state.write.finish() {
            state.positions.write_pos = cursor;
        }
        trace!(committed, write_pos = state.positions.write_pos, "write transaction committed");
        committed
    }
}

impl<T> Locked<'_, T> {
    /// Close the write transaction without publishing anything
    pub(crate) fn write_abort(&mut self) {
        let discarded = self.state.write.transferred;
        self.state.write.finish();
        trace!(discarded, "write transaction abandoned");
    }

    pub(crate) fn write_active(&self) -> bool {
        self.state.write.active
    }

    pub(crate) fn write_budget(&self) -> usize {
        self.state.write.budget
    }

    pub(crate) fn write_remaining(&self) -> usize {
        self.state.write.remaining
    }

    pub(crate) fn written(&self) -> usize {
        self.state.write.transferred
    }
}
