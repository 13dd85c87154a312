use std::fmt;

use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

use crate::config::RingBufferConfig;
use crate::error::{Result, RingBufferError};
use crate::position::{Positions, Transfer};
use crate::transaction::{ReadTransaction, WriteTransaction};

/// Everything the lock protects
pub(crate) struct State<T> {
    pub(crate) storage: Box<[T]>,
    pub(crate) positions: Positions,
    pub(crate) write: Transfer,
    pub(crate) read: Transfer,
}

impl<T> State<T> {
    /// Re-base the counters unless a transaction on either side is still open
    pub(crate) fn rebase_if_idle(&mut self) {
        if !self.write.active && !self.read.active {
            self.positions.rebase();
        }
    }
}

/// Fixed-capacity ring buffer shared by one producer and one consumer
///
/// - Plain `Copy` elements, copied in and out; no references into storage escape
/// - A single exclusive lock serializes every transaction, read or write
/// - Producer workflow: `write_start` → repeated `write` → `end`
/// - Consumer workflow: `read_start` → repeated `read` → `end`
/// - Nothing written becomes visible to the reader until the write transaction ends,
///   and nothing read frees space until the read transaction ends
///
/// Three call-site tiers are available:
/// - scoped transactions ([`write_start`](Self::write_start), [`try_write_start`](Self::try_write_start)
///   and their read counterparts), which own the lock and always release it
/// - raw primitives on a [`Locked`] guard, for callers managing the lock themselves
/// - one-shot [`write`](Self::write)/[`read`](Self::read) helpers for small transfers
pub struct RingBuffer<T> {
    // Copy of the locked capacity so `capacity()` answers without the lock
    capacity: usize,
    state: Mutex<State<T>>,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a ring buffer holding `capacity` elements
    ///
    /// # Returns
    /// * `Err(RingBufferError::InvalidCapacity)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(RingBufferConfig::new(capacity))
    }

    /// Create a ring buffer from a validated config
    pub fn with_config(config: RingBufferConfig) -> Result<Self> {
        config.validate()?;

        let storage = vec![T::default(); config.capacity].into_boxed_slice();
        let state = State {
            storage,
            positions: Positions::new(config.capacity, config.rebase_threshold),
            write: Transfer::default(),
            read: Transfer::default(),
        };

        Ok(Self {
            capacity: config.capacity,
            state: Mutex::new(state),
        })
    }
}

impl<T: Copy> RingBuffer<T> {
    /// Total number of elements the buffer can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Acquire the lock, blocking until it is free
    ///
    /// The returned guard exposes the raw transaction primitives. The lock is
    /// released when the guard is dropped or [`Locked::unlock`] is called.
    pub fn lock(&self) -> Locked<'_, T> {
        Locked {
            state: self.state.lock(),
        }
    }

    /// Acquire the lock if it is free, never blocking
    pub fn try_lock(&self) -> Option<Locked<'_, T>> {
        self.state.try_lock().map(|state| Locked { state })
    }

    /// Free space, read under a momentary lock
    pub fn write_size(&self) -> usize {
        self.lock().write_size()
    }

    /// Unread data, read under a momentary lock
    pub fn read_size(&self) -> usize {
        self.lock().read_size()
    }

    /// Whether there is nothing to read
    pub fn is_empty(&self) -> bool {
        self.read_size() == 0
    }

    /// Whether there is no room to write
    pub fn is_full(&self) -> bool {
        self.write_size() == 0
    }

    /// Discard all unread data
    ///
    /// # Returns
    /// * the number of elements dropped
    pub fn clear(&self) -> usize {
        self.lock().clear()
    }

    /// Lock and open a write transaction
    ///
    /// # Returns
    /// * `Some(WriteTransaction)` holding the lock with a non-zero budget
    /// * `None` if the buffer is full; the lock has already been released
    pub fn write_start(&self) -> Option<WriteTransaction<'_, T>> {
        WriteTransaction::open(self.lock())
    }

    /// Open a write transaction without waiting for the lock
    ///
    /// # Returns
    /// * `Ok(Some(WriteTransaction))` on success
    /// * `Ok(None)` if the buffer is full; the lock has already been released
    /// * `Err(RingBufferError::LockContended)` if another caller holds the lock
    pub fn try_write_start(&self) -> Result<Option<WriteTransaction<'_, T>>> {
        let locked = self.try_lock_or_contended()?;
        Ok(WriteTransaction::open(locked))
    }

    /// Lock and open a read transaction
    ///
    /// # Returns
    /// * `Some(ReadTransaction)` holding the lock with data to read
    /// * `None` if the buffer is empty; the lock has already been released
    pub fn read_start(&self) -> Option<ReadTransaction<'_, T>> {
        ReadTransaction::open(self.lock())
    }

    /// Open a read transaction without waiting for the lock
    ///
    /// # Returns
    /// * `Ok(Some(ReadTransaction))` on success
    /// * `Ok(None)` if the buffer is empty; the lock has already been released
    /// * `Err(RingBufferError::LockContended)` if another caller holds the lock
    pub fn try_read_start(&self) -> Result<Option<ReadTransaction<'_, T>>> {
        let locked = self.try_lock_or_contended()?;
        Ok(ReadTransaction::open(locked))
    }

    /// Write as much of `data` as fits in one locked transaction
    ///
    /// Meant for small one-off writes; larger streams should hold a
    /// [`WriteTransaction`] across several `write` calls instead.
    ///
    /// # Returns
    /// * `Ok(n)` with the number of elements written, possibly less than `data.len()`
    /// * `Err(RingBufferError::InvalidArgument)` if `data` is empty
    /// * `Err(RingBufferError::Full)` if there was no free space
    pub fn write(&self, data: &[T]) -> Result<usize> {
        if data.is_empty() {
            return Err(RingBufferError::InvalidArgument);
        }

        let mut tx = self.write_start().ok_or(RingBufferError::Full)?;
        tx.write(data)?;
        Ok(tx.end())
    }

    /// Like [`write`](Self::write), but fails with `LockContended` instead of blocking
    pub fn try_write(&self, data: &[T]) -> Result<usize> {
        if data.is_empty() {
            return Err(RingBufferError::InvalidArgument);
        }

        let mut tx = self.try_write_start()?.ok_or(RingBufferError::Full)?;
        tx.write(data)?;
        Ok(tx.end())
    }

    /// Read up to `out.len()` elements in one locked transaction
    ///
    /// # Returns
    /// * `Ok(n)` with the number of elements copied into `out`
    /// * `Err(RingBufferError::InvalidArgument)` if `out` is empty
    /// * `Err(RingBufferError::Empty)` if there was nothing to read
    pub fn read(&self, out: &mut [T]) -> Result<usize> {
        if out.is_empty() {
            return Err(RingBufferError::InvalidArgument);
        }

        let mut tx = self.read_start().ok_or(RingBufferError::Empty)?;
        tx.read(out)?;
        Ok(tx.end())
    }

    /// Like [`read`](Self::read), but fails with `LockContended` instead of blocking
    pub fn try_read(&self, out: &mut [T]) -> Result<usize> {
        if out.is_empty() {
            return Err(RingBufferError::InvalidArgument);
        }

        let mut tx = self.try_read_start()?.ok_or(RingBufferError::Empty)?;
        tx.read(out)?;
        Ok(tx.end())
    }

    fn try_lock_or_contended(&self) -> Result<Locked<'_, T>> {
        self.try_lock().ok_or_else(|| {
            trace!("ring buffer lock contended");
            RingBufferError::LockContended
        })
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("RingBuffer");
        s.field("capacity", &self.capacity);
        match self.state.try_lock() {
            Some(state) => s
                .field("read_pos", &state.positions.read_pos)
                .field("write_pos", &state.positions.write_pos)
                .field("write_active", &state.write.active)
                .field("read_active", &state.read.active),
            None => s.field("state", &format_args!("<locked>")),
        };
        s.finish()
    }
}

/// Exclusive access to a ring buffer's state
///
/// This is the raw tier: the write and read primitives (`write_start`/`write`/
/// `write_end` and `read_start`/`read`/`read_end`) have no effect on the lock.
/// A raw transaction may even be left open across several lock holds; its
/// bookkeeping lives in the buffer, not in the guard.
pub struct Locked<'a, T> {
    pub(crate) state: MutexGuard<'a, State<T>>,
}

impl<T> Locked<'_, T> {
    /// Release the lock
    pub fn unlock(self) {}

    /// Total number of elements the buffer can hold
    pub fn capacity(&self) -> usize {
        self.state.positions.capacity()
    }

    /// Free space as of now
    pub fn write_size(&self) -> usize {
        self.state.positions.available_to_write()
    }

    /// Unread data as of now
    pub fn read_size(&self) -> usize {
        self.state.positions.available_to_read()
    }

    /// Discard all unread data, returning how much was dropped
    ///
    /// An open read transaction is closed without publishing.
    pub fn clear(&mut self) -> usize {
        let state = &mut *self.state;
        let dropped = state.positions.available_to_read();
        state.read.finish();
        state.positions.read_pos = state.positions.write_pos;
        trace!(dropped, "ring buffer cleared");
        dropped
    }
}

impl<T> fmt::Debug for Locked<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locked")
            .field("capacity", &self.state.positions.capacity())
            .field("read_pos", &self.state.positions.read_pos)
            .field("write_pos", &self.state.positions.write_pos)
            .field("write", &self.state.write)
            .field("read", &self.state.read)
            .finish()
    }
}
