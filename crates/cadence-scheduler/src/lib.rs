//! Tick-Driven Consumer with Adaptive Cadence
//!
//! A [`TickConsumer`] is invoked once per tick by a [`TickSource`]. It only
//! attempts a dequeue every `ticks_per_attempt + manual_slowdown` enabled
//! ticks. Each time an attempt finds the buffer empty the cadence widens by
//! one tick and consumption is disabled until the producer next observes a
//! full buffer.

mod cadence;
mod consumer;
mod gate;
mod slowdown;
mod tick;

pub use cadence::CadenceController;
pub use consumer::{TickConsumer, TickOutcome};
pub use gate::EnableFlag;
pub use slowdown::ManualSlowdown;
pub use tick::TickSource;
