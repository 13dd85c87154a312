//! # ringlock - Lock-guarded transactional ring buffer
//!
//! A fixed-capacity circular buffer shared by one producer and one consumer.
//!
//! ## Design
//!
//! - Storage of plain `Copy` elements, allocated once at construction
//! - Two monotonic positions whose difference is the unread amount, so a full
//!   buffer and an empty one never look alike
//! - A single exclusive lock; read and write transactions are totally ordered
//! - Producer workflow: `write_start` → repeated `write` → `end`
//! - Consumer workflow: `read_start` → repeated `read` → `end`
//! - Transfers past the remaining budget truncate and report what was moved
//! - Transfers crossing the end of storage are split into two copies
//!
//! ## Example
//!
//! ```
//! use ringlock::RingBuffer;
//!
//! let rb = RingBuffer::<u8>::new(8).unwrap();
//!
//! // Producer: open, write, commit (releases the lock)
//! if let Some(mut tx) = rb.write_start() {
//!     tx.write(b"hello").unwrap();
//!     assert_eq!(tx.end(), 5);
//! }
//!
//! // Consumer: read in batch
//! let mut out = [0u8; 8];
//! let mut tx = rb.read_start().unwrap();
//! let n = tx.read(&mut out).unwrap();
//! assert_eq!(&out[..n], b"hello");
//! tx.end(); // Release space to the producer
//! ```
//!
//! Callers that manage the lock themselves use the raw primitives on
//! [`Locked`]:
//!
//! ```
//! use ringlock::RingBuffer;
//!
//! let rb = RingBuffer::<u32>::new(4).unwrap();
//! let mut locked = rb.lock();
//! locked.write_start();
//! locked.write(&[1, 2, 3]).unwrap();
//! locked.write_end();
//! locked.unlock();
//!
//! assert_eq!(rb.read_size(), 3);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod position;
mod read;
mod ring_buffer;
mod transaction;
mod write;

pub use config::{RingBufferConfig, DEFAULT_REBASE_THRESHOLD};
pub use error::{Result, RingBufferError};
pub use ring_buffer::{Locked, RingBuffer};
pub use transaction::{ReadTransaction, WriteTransaction};
