//! RGB Workload Producer
//!
//! Enumerates every 3-byte colour triple in order, forever, and pushes each
//! one into the ring buffer. The producer spins while the buffer is full and
//! raises the consumer gate the first time it sees it full.

mod producer;
mod rgb;

pub use producer::{ProducerConfig, RgbProducer};
pub use rgb::{Rgb, RgbSequence};
