//! Producer Loop Implementation

use crate::{Rgb, RgbSequence};
use cadence_scheduler::EnableFlag;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ring_buffer::Producer;
use std::hint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use text_sink::TextSink;
use tracing::{debug, info};

/// Busy spins before falling back to yielding the thread
const SPINS_BEFORE_YIELD: u32 = 64;

/// Configuration for the producer
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Upper bound (inclusive) of the per-item pause, in delay units (default: 15)
    pub max_delay_units: u32,
    /// Length of one delay unit (default: 1 ms)
    pub delay_unit: Duration,
    /// Seed for the delay generator; random when unset
    pub seed: Option<u64>,
    /// Transmit a line for every produced triple
    pub trace_produced: bool,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            max_delay_units: 15,
            delay_unit: Duration::from_millis(1),
            seed: None,
            trace_produced: false,
        }
    }
}

/// Producer half of the pipeline, run on its own thread
pub struct RgbProducer<const N: usize> {
    /// Write side of the ring buffer
    queue: Producer<Rgb, N>,
    /// Consumption gate, raised here when the buffer is seen full
    gate: Arc<EnableFlag>,
    /// Diagnostic output
    sink: Arc<dyn TextSink>,
    /// Workload
    sequence: RgbSequence,
    /// Per-item pause generator
    rng: StdRng,
    /// Configuration
    config: ProducerConfig,
    /// Cleared to stop the loop
    running: Arc<AtomicBool>,
    /// Triples enqueued so far
    produced: u64,
}

impl<const N: usize> RgbProducer<N> {
    /// Create a producer starting at `(0, 0, 0)`
    pub fn new(
        queue: Producer<Rgb, N>,
        gate: Arc<EnableFlag>,
        sink: Arc<dyn TextSink>,
        config: ProducerConfig,
        running: Arc<AtomicBool>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            queue,
            gate,
            sink,
            sequence: RgbSequence::new(),
            rng,
            config,
            running,
            produced: 0,
        }
    }

    /// Enqueue the next triple, spinning while the buffer is full.
    ///
    /// Returns `None` only if the stop flag was cleared while waiting.
    pub fn produce_one(&mut self) -> Option<Rgb> {
        if !self.wait_for_space() {
            return None;
        }

        let rgb = self.sequence.next_rgb();
        self.queue.enqueue(rgb);
        self.produced += 1;
        metrics::counter!("rgb_produced_total").increment(1);

        if self.config.trace_produced {
            self.sink
                .transmit_or_log(&format!(">>>>> Produced: {}\n", rgb));
        }

        Some(rgb)
    }

    /// Spin until there is a free slot. Seeing the buffer full raises the
    /// consumer gate, so consumption always starts from a full buffer.
    fn wait_for_space(&mut self) -> bool {
        let mut spins = 0u32;

        while self.queue.is_full() {
            if self.gate.enable() {
                debug!(produced = self.produced, "Queue full, consumer enabled");
            }
            if !self.running.load(Ordering::Acquire) {
                return false;
            }
            if spins < SPINS_BEFORE_YIELD {
                hint::spin_loop();
                spins += 1;
            } else {
                thread::yield_now();
            }
        }

        true
    }

    /// Draw the pause that follows one enqueue
    pub fn next_delay(&mut self) -> Duration {
        let units = self.rng.gen_range(0..=self.config.max_delay_units);
        self.config.delay_unit.saturating_mul(units)
    }

    /// Produce until the stop flag is cleared; returns the number of triples enqueued
    pub fn run(&mut self) -> u64 {
        info!(
            capacity = self.queue.capacity(),
            max_delay_units = self.config.max_delay_units,
            "Starting producer"
        );

        while self.running.load(Ordering::Acquire) {
            if self.produce_one().is_none() {
                break;
            }

            let delay = self.next_delay();
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        info!(produced = self.produced, "Producer stopped");
        self.produced
    }

    /// Triples enqueued so far
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// The triple that will be enqueued next
    pub fn next_rgb(&self) -> Rgb {
        self.sequence.peek()
    }
}
