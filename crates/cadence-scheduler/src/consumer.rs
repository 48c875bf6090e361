//! Tick Consumer Implementation

use crate::{CadenceController, EnableFlag, ManualSlowdown};
use ring_buffer::Consumer;
use std::fmt::Display;
use std::sync::Arc;
use text_sink::TextSink;
use tracing::{debug, warn};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome<T> {
    /// Gate lowered; nothing counted
    Disabled,
    /// Counted, but no attempt due yet
    Waiting,
    /// Attempt succeeded
    Consumed {
        /// Dequeued item
        item: T,
        /// Effective cadence at the time of the attempt
        cadence: u32,
    },
    /// Attempt found the buffer empty; cadence widened and gate lowered
    Starved {
        /// New calibrated cadence
        ticks_per_attempt: u32,
    },
}

/// Consumer half of the pipeline, run once per tick.
///
/// Never blocks. Owns the cadence state outright; shares only the ring
/// consumer handle, the enable gate, the slowdown knob and the sink.
pub struct TickConsumer<T: Copy, const N: usize> {
    /// Read side of the ring buffer
    queue: Consumer<T, N>,
    /// Consumption gate raised by the producer
    gate: Arc<EnableFlag>,
    /// Externally adjustable extra ticks
    slowdown: Arc<ManualSlowdown>,
    /// Calibration state
    cadence: CadenceController,
    /// Diagnostic output
    sink: Arc<dyn TextSink>,
}

impl<T: Copy + Display, const N: usize> TickConsumer<T, N> {
    /// Create a tick consumer
    pub fn new(
        queue: Consumer<T, N>,
        gate: Arc<EnableFlag>,
        slowdown: Arc<ManualSlowdown>,
        cadence: CadenceController,
        sink: Arc<dyn TextSink>,
    ) -> Self {
        metrics::gauge!("cadence_ticks_per_attempt").set(cadence.ticks_per_attempt() as f64);

        Self {
            queue,
            gate,
            slowdown,
            cadence,
            sink,
        }
    }

    /// Handle one tick
    pub fn on_tick(&mut self) -> TickOutcome<T> {
        if !self.gate.is_enabled() {
            return TickOutcome::Disabled;
        }

        let slowdown = self.slowdown.get();
        if !self.cadence.tick(slowdown) {
            return TickOutcome::Waiting;
        }

        match self.queue.try_dequeue() {
            Ok(item) => {
                let cadence = self.cadence.effective_cadence(slowdown);
                self.sink.transmit_or_log(&format!(
                    "<<<<< Consumed: {} consuming every: {}\n",
                    item, cadence
                ));
                metrics::counter!("cadence_consumed_total").increment(1);
                TickOutcome::Consumed { item, cadence }
            }
            Err(_) => {
                let ticks_per_attempt = self.cadence.record_starvation();
                self.gate.disable();
                warn!(ticks_per_attempt, "Queue drained, widening cadence");
                debug!("Consumer disabled until producer observes a full queue");
                self.sink.transmit_or_log(&format!(
                    "Queue is empty! Increased consume_every to: {}\n",
                    ticks_per_attempt
                ));
                metrics::counter!("cadence_starvation_total").increment(1);
                metrics::gauge!("cadence_ticks_per_attempt").set(ticks_per_attempt as f64);
                TickOutcome::Starved { ticks_per_attempt }
            }
        }
    }

    /// Calibration state
    pub fn cadence(&self) -> &CadenceController {
        &self.cadence
    }

    /// Consumption gate
    pub fn gate(&self) -> &EnableFlag {
        &self.gate
    }

    /// Items currently waiting in the buffer
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
