use crate::error::{Result, RingBufferError};

/// Default point at which position counters get re-based
pub const DEFAULT_REBASE_THRESHOLD: usize = usize::MAX / 2;

/// Construction parameters for a [`RingBuffer`](crate::RingBuffer)
///
/// ```
/// use ringlock::RingBufferConfig;
///
/// let config = RingBufferConfig::new(1024).with_rebase_threshold(1 << 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingBufferConfig {
    /// Number of elements the buffer holds
    pub capacity: usize,
    /// Once the read position reaches this value, both positions are reduced
    /// by a multiple of `capacity` before the next transaction opens
    #[cfg_attr(feature = "serde", serde(default = "default_rebase_threshold"))]
    pub rebase_threshold: usize,
}

#[cfg(feature = "serde")]
fn default_rebase_threshold() -> usize {
    DEFAULT_REBASE_THRESHOLD
}

impl RingBufferConfig {
    /// Config for `capacity` elements with the default rebase threshold
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rebase_threshold: DEFAULT_REBASE_THRESHOLD,
        }
    }

    /// Override the rebase threshold
    pub fn with_rebase_threshold(mut self, threshold: usize) -> Self {
        self.rebase_threshold = threshold;
        self
    }

    /// Check the config before a buffer is built from it
    ///
    /// # Returns
    /// * `Err(RingBufferError::InvalidCapacity)` if `capacity` is 0
    /// * `Err(RingBufferError::InvalidRebaseThreshold)` if the threshold is below
    ///   `capacity`, or so high that positions could overflow before re-basing
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(RingBufferError::InvalidCapacity);
        }
        // read_pos may pass the threshold by one capacity, write_pos leads it by another
        let max_threshold = usize::MAX - self.capacity.saturating_mul(2);
        if self.rebase_threshold < self.capacity || self.rebase_threshold > max_threshold {
            return Err(RingBufferError::InvalidRebaseThreshold {
                threshold: self.rebase_threshold,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
