//! Lock-Free SPSC Ring Buffer
//!
//! Fixed-capacity circular storage shared by exactly one producer and one
//! consumer. The buffer is split into a [`Producer`] and a [`Consumer`]
//! handle; each handle is the sole writer of one index, so neither side
//! needs a lock or a compare-and-swap.
//!
//! ```
//! use ring_buffer::RingBuffer;
//!
//! let (mut producer, mut consumer) = RingBuffer::<u8, 4>::new().split();
//! producer.enqueue(7);
//! assert_eq!(consumer.dequeue(), 7);
//! assert!(consumer.is_empty());
//! ```

mod buffer;
mod error;

pub use buffer::{Consumer, Producer, RingBuffer};
pub use error::RingError;
