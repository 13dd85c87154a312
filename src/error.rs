use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = RingBufferError> = std::result::Result<T, E>;

/// Failure conditions surfaced by ring buffer operations
///
/// Running out of space (or data) while a transaction is open is never an
/// error: transfers silently truncate and report the amount actually moved.
/// `Full` and `Empty` are only returned by the one-shot helpers, which have no
/// other way to say that nothing could be moved at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingBufferError {
    /// An empty slice was passed to a transfer call
    #[error("transfer requires a non-empty slice")]
    InvalidArgument,
    /// A non-blocking start could not obtain the lock
    #[error("ring buffer lock is held by another caller")]
    LockContended,
    /// A one-shot write found no free space
    #[error("ring buffer is full")]
    Full,
    /// A one-shot read found no unread data
    #[error("ring buffer is empty")]
    Empty,
    /// Capacity must be at least one element
    #[error("ring buffer capacity must be greater than zero")]
    InvalidCapacity,
    /// The re-basing threshold must lie between the capacity and the point
    /// where positions could overflow
    #[error("rebase threshold {threshold} is out of range for capacity {capacity}")]
    InvalidRebaseThreshold {
        /// Configured threshold
        threshold: usize,
        /// Configured capacity
        capacity: usize,
    },
}
