use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::ring_buffer::Locked;

/// An open write transaction that owns the buffer's lock
///
/// Created by [`RingBuffer::write_start`](crate::RingBuffer::write_start) or
/// [`RingBuffer::try_write_start`](crate::RingBuffer::try_write_start).
/// [`end`](Self::end) publishes the written data and releases the lock.
/// Dropping the transaction without ending it discards everything written in
/// it and releases the lock.
pub struct WriteTransaction<'a, T> {
    locked: Locked<'a, T>,
}

impl<'a, T: Copy> WriteTransaction<'a, T> {
    /// Open a transaction on an already held lock
    ///
    /// Gives the lock back right away when there is no room to write.
    pub(crate) fn open(mut locked: Locked<'a, T>) -> Option<Self> {
        if locked.write_start() == 0 {
            locked.write_abort();
            debug!("ring buffer full, releasing lock");
            return None;
        }
        Some(Self { locked })
    }

    /// Copy as much of `data` as the remaining budget allows
    ///
    /// # Returns
    /// * `Ok(n)` with the number of elements copied
    /// * `Err(RingBufferError::InvalidArgument)` if `data` is empty
    pub fn write(&mut self, data: &[T]) -> Result<usize> {
        self.locked.write(data)
    }

    /// Commit and release the lock, returning the number of elements written
    pub fn end(mut self) -> usize {
        self.locked.write_end()
    }
}

impl<T> WriteTransaction<'_, T> {
    /// Free space when the transaction began
    pub fn budget(&self) -> usize {
        self.locked.write_budget()
    }

    /// Space still left in this transaction
    pub fn remaining(&self) -> usize {
        self.locked.write_remaining()
    }

    /// Elements written so far
    pub fn written(&self) -> usize {
        self.locked.written()
    }
}

impl<T> Drop for WriteTransaction<'_, T> {
    fn drop(&mut self) {
        if self.locked.write_active() {
            self.locked.write_abort();
        }
    }
}

impl<T> fmt::Debug for WriteTransaction<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteTransaction")
            .field("budget", &self.budget())
            .field("remaining", &self.remaining())
            .field("written", &self.written())
            .finish()
    }
}

/// An open read transaction that owns the buffer's lock
///
/// [`end`](Self::end) frees the space of everything read and releases the
/// lock. Dropping the transaction without ending it leaves the data unread.
pub struct ReadTransaction<'a, T> {
    locked: Locked<'a, T>,
}

impl<'a, T: Copy> ReadTransaction<'a, T> {
    pub(crate) fn open(mut locked: Locked<'a, T>) -> Option<Self> {
        if locked.read_start() == 0 {
            locked.read_abort();
            debug!("ring buffer empty, releasing lock");
            return None;
        }
        Some(Self { locked })
    }

    /// Copy up to `out.len()` elements into `out`
    pub fn read(&mut self, out: &mut [T]) -> Result<usize> {
        self.locked.read(out)
    }

    /// Copy without consuming
    pub fn peek(&self, out: &mut [T]) -> Result<usize> {
        self.locked.peek(out)
    }

    /// Consume up to `count` elements without copying them
    pub fn skip(&mut self, count: usize) -> Result<usize> {
        self.locked.skip(count)
    }

    /// Commit and release the lock, returning the number of elements consumed
    pub fn end(mut self) -> usize {
        self.locked.read_end()
    }
}

impl<T> ReadTransaction<'_, T> {
    /// Unread data when the transaction began
    pub fn budget(&self) -> usize {
        self.locked.read_budget()
    }

    /// Data still left in this transaction
    pub fn remaining(&self) -> usize {
        self.locked.read_remaining()
    }

    /// Elements consumed so far
    pub fn consumed(&self) -> usize {
        self.locked.consumed()
    }
}

impl<T> Drop for ReadTransaction<'_, T> {
    fn drop(&mut self) {
        if self.locked.read_active() {
            self.locked.read_abort();
        }
    }
}

impl<T> fmt::Debug for ReadTransaction<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadTransaction")
            .field("budget", &self.budget())
            .field("remaining", &self.remaining())
            .field("consumed", &self.consumed())
            .finish()
    }
}
