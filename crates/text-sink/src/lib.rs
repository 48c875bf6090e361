//! Diagnostic Text Output
//!
//! Both execution contexts print diagnostic lines. A [`TextSink`] guarantees
//! that one `transmit` call is never interleaved with another, whichever
//! context issued it.

mod error;
mod sink;

pub use error::SinkError;
pub use sink::{MemorySink, SerializedSink, TextSink};
