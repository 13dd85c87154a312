use tracing::trace;

use crate::error::{Result, RingBufferError};
use crate::ring_buffer::Locked;

impl<T: Copy> Locked<'_, T> {
    /// Open a read transaction
    ///
    /// Snapshots the unread data as the transaction's budget. Positions are
    /// re-based first when no other transaction is open.
    ///
    /// # Returns
    /// * the budget; 0 means there is nothing to read
    pub fn read_start(&mut self) -> usize {
        let state = &mut *self.state;
        state.rebase_if_idle();

        let budget = state.positions.available_to_read();
        state.read.begin(state.positions.read_pos, budget);
        trace!(budget, read_pos = state.positions.read_pos, "read transaction opened");
        budget
    }

    /// Copy up to `out.len()` elements out of the buffer and advance the cursor
    ///
    /// Space is not handed back to writers until [`read_end`](Self::read_end).
    ///
    /// # Returns
    /// * `Ok(n)` with the number of elements copied into the front of `out`
    /// * `Err(RingBufferError::InvalidArgument)` if `out` is empty
    pub fn read(&mut self, out: &mut [T]) -> Result<usize> {
        let len = self.peek(out)?;
        self.state.read.advance(len);
        Ok(len)
    }

    /// Copy like [`read`](Self::read) without advancing the cursor
    pub fn peek(&self, out: &mut [T]) -> Result<usize> {
        if out.is_empty() {
            return Err(RingBufferError::InvalidArgument);
        }

        let state = &*self.state;
        let len = state.read.clamp(out.len());
        if len == 0 {
            return Ok(0);
        }

        let (head, tail) = state.positions.spans(state.read.cursor, len);
        let split = head.len();
        out[..split].copy_from_slice(&state.storage[head]);
        out[split..len].copy_from_slice(&state.storage[tail]);
        Ok(len)
    }

    /// Advance the cursor by up to `count` elements without copying them
    ///
    /// # Returns
    /// * `Ok(n)` with the number of elements skipped
    /// * `Err(RingBufferError::InvalidArgument)` if `count` is 0
    pub fn skip(&mut self, count: usize) -> Result<usize> {
        if count == 0 {
            return Err(RingBufferError::InvalidArgument);
        }

        let len = self.state.read.clamp(count);
        self.state.read.advance(len);
        Ok(len)
    }

    /// Commit the read transaction, freeing the space of everything consumed
    ///
    /// # Returns
    /// * the number of elements consumed
    pub fn read_end(&mut self) -> usize {
        let state = &mut *self.state;
        let consumed = state.read.transferred;
        if let Some(cursor) = state.read.finish() {
            state.positions.read_pos = cursor;
        }
        trace!(consumed, read_pos = state.positions.read_pos, "read transaction committed");
        consumed
    }
}

impl<T> Locked<'_, T> {
    /// Close the read transaction, leaving the data unread
    pub(crate) fn read_abort(&mut self) {
        let discarded = self.state.read.transferred;
        self.state.read.finish();
        trace!(discarded, "read transaction abandoned");
    }

    pub(crate) fn read_active(&self) -> bool {
        self.state.read.active
    }

    pub(crate) fn read_budget(&self) -> usize {
        self.state.read.budget
    }

    pub(crate) fn read_remaining(&self) -> usize {
        self.state.read.remaining
    }

    pub(crate) fn consumed(&self) -> usize {
        self.state.read.transferred
    }
}

#[cfg(test)]
mod tests {
    use crate::{RingBuffer, RingBufferError};

    #[test]
    fn test_raw_read_frees_space_on_commit() {
        let rb = RingBuffer::new(4).unwrap();
        rb.write(&[1u8, 2, 3, 4]).unwrap();

        let mut locked = rb.lock();
        assert_eq!(locked.read_start(), 4);
        let mut out = [0u8; 2];
        assert_eq!(locked.read(&mut out), Ok(2));
        assert_eq!(out, [1, 2]);
        assert_eq!(locked.write_size(), 0);
        assert_eq!(locked.read_end(), 2);
        assert_eq!(locked.write_size(), 2);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let rb = RingBuffer::new(4).unwrap();
        rb.write(&[7u8, 8]).unwrap();

        let mut locked = rb.lock();
        locked.read_start();
        let mut out = [0u8; 4];
        assert_eq!(locked.peek(&mut out), Ok(2));
        assert_eq!(locked.peek(&mut out), Ok(2));
        assert_eq!(&out[..2], &[7, 8]);
        assert_eq!(locked.read_end(), 0);
        assert_eq!(locked.read_size(), 2);
    }

    #[test]
    fn test_skip_counts_as_consumed() {
        let rb = RingBuffer::new(8).unwrap();
        rb.write(&[1u8, 2, 3, 4, 5]).unwrap();

        let mut locked = rb.lock();
        locked.read_start();
        assert_eq!(locked.skip(0), Err(RingBufferError::InvalidArgument));
        assert_eq!(locked.skip(3), Ok(3));
        let mut out = [0u8; 8];
        assert_eq!(locked.read(&mut out), Ok(2));
        assert_eq!(&out[..2], &[4, 5]);
        assert_eq!(locked.skip(1), Ok(0));
        assert_eq!(locked.read_end(), 5);
    }

    #[test]
    fn test_raw_read_rejects_empty_slice() {
        let rb = RingBuffer::new(4).unwrap();
        rb.write(&[1u8]).unwrap();

        let mut locked = rb.lock();
        locked.read_start();
        assert_eq!(locked.read(&mut []), Err(RingBufferError::InvalidArgument));
        assert_eq!(locked.read_end(), 0);
        assert_eq!(locked.state.positions.read_pos, 0);
    }

    #[test]
    fn test_read_splits_across_boundary() {
        let rb = RingBuffer::new(4).unwrap();
        rb.write(&[1u8, 2, 3]).unwrap();
        let mut out = [0u8; 3];
        rb.read(&mut out).unwrap();
        rb.write(&[4u8, 5, 6]).unwrap();

        let mut locked = rb.lock();
        assert_eq!(locked.read_start(), 3);
        assert_eq!(locked.read(&mut out), Ok(3));
        assert_eq!(out, [4, 5, 6]);
    }

    #[test]
    fn test_interleaved_raw_transactions_skip_rebase() {
        let config = crate::RingBufferConfig::new(4).with_rebase_threshold(4);
        let rb = RingBuffer::with_config(config).unwrap();
        rb.write(&[1u8, 2, 3, 4]).unwrap();
        let mut out = [0u8; 4];
        rb.read(&mut out[..1]).unwrap();

        let mut locked = rb.lock();
        assert_eq!(locked.write_start(), 1);
        assert_eq!(locked.write(&[5u8]), Ok(1));

        assert_eq!(locked.read_start(), 3);
        assert_eq!(locked.read(&mut out), Ok(3));
        assert_eq!(&out[..3], &[2, 3, 4]);
        assert_eq!(locked.read_end(), 3);

        // read_pos has reached the threshold, but the open write must not move
        assert_eq!(locked.read_start(), 0);
        assert_eq!(locked.state.positions.read_pos, 4);
        assert_eq!(locked.write_end(), 1);
        locked.read_end();

        assert_eq!(locked.read_start(), 1);
        assert_eq!(locked.state.positions.read_pos, 0);
        assert_eq!(locked.state.positions.write_pos, 1);
        assert_eq!(locked.read(&mut out), Ok(1));
        assert_eq!(out[0], 5);
    }
}
