//! Shared pipeline context

use crate::{PipelineConfig, PipelineError};
use cadence_scheduler::{CadenceController, EnableFlag, ManualSlowdown, TickConsumer, TickSource};
use rgb_producer::{Rgb, RgbProducer};
use ring_buffer::RingBuffer;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use text_sink::TextSink;
use tracing::info;

/// Ring buffer slots used by the binary (127 usable)
pub const QUEUE_SLOTS: usize = 128;

/// Banner transmitted once before ticking starts
pub const BANNER: &str = "Producer/Consumer Example\n\n";

/// State shared by the producer thread and the tick task.
///
/// Created once at startup; lives as long as the pipeline.
#[derive(Clone)]
pub struct PipelineContext {
    /// Consumption gate
    gate: Arc<EnableFlag>,
    /// Manual slowdown knob
    slowdown: Arc<ManualSlowdown>,
    /// Diagnostic output
    sink: Arc<dyn TextSink>,
    /// Cleared to stop the producer
    running: Arc<AtomicBool>,
}

impl PipelineContext {
    /// Create a context with the gate lowered
    pub fn new(sink: Arc<dyn TextSink>, manual_slowdown: u32) -> Self {
        Self {
            gate: Arc::new(EnableFlag::new()),
            slowdown: Arc::new(ManualSlowdown::new(manual_slowdown)),
            sink,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Consumption gate
    pub fn gate(&self) -> &Arc<EnableFlag> {
        &self.gate
    }

    /// Manual slowdown knob
    pub fn slowdown(&self) -> &Arc<ManualSlowdown> {
        &self.slowdown
    }

    /// Diagnostic output
    pub fn sink(&self) -> &Arc<dyn TextSink> {
        &self.sink
    }

    /// Whether the producer should keep going
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the producer to stop
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Totals reported when the pipeline stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    /// Ticks delivered to the consumer
    pub ticks: u64,
    /// Triples enqueued by the producer
    pub produced: u64,
    /// Calibrated cadence at shutdown
    pub ticks_per_attempt: u32,
}

/// Producer, consumer and tick source wired around one ring buffer
pub struct Pipeline<const N: usize> {
    context: PipelineContext,
    producer: RgbProducer<N>,
    consumer: TickConsumer<Rgb, N>,
    ticks: TickSource,
}

impl<const N: usize> Pipeline<N> {
    /// Wire up a pipeline from validated configuration
    pub fn new(config: &PipelineConfig, sink: Arc<dyn TextSink>) -> Self {
        let context = PipelineContext::new(sink, config.manual_slowdown);
        let (queue_in, queue_out) = RingBuffer::<Rgb, N>::new().split();

        let producer = RgbProducer::new(
            queue_in,
            Arc::clone(&context.gate),
            Arc::clone(&context.sink),
            config.producer_config(),
            Arc::clone(&context.running),
        );
        let consumer = TickConsumer::new(
            queue_out,
            Arc::clone(&context.gate),
            Arc::clone(&context.slowdown),
            CadenceController::new(config.initial_ticks_per_attempt),
            Arc::clone(&context.sink),
        );

        Self {
            context,
            producer,
            consumer,
            ticks: TickSource::new(config.tick_period()),
        }
    }

    /// Shared context
    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Run until `shutdown` resolves.
    ///
    /// The producer gets its own OS thread; the consumer runs inline on the
    /// calling task, once per tick.
    pub async fn run<S>(self, shutdown: S) -> Result<PipelineReport, PipelineError>
    where
        S: Future<Output = ()>,
    {
        let Self {
            context,
            mut producer,
            mut consumer,
            ticks: tick_source,
        } = self;

        context.sink.transmit_or_log(BANNER);
        info!(
            slots = N,
            tick_period_ms = tick_source.period().as_millis() as u64,
            "Starting pipeline"
        );

        let producer_thread = thread::Builder::new()
            .name("rgb-producer".to_string())
            .spawn(move || producer.run())?;

        let ticks = tick_source
            .drive(
                || {
                    consumer.on_tick();
                },
                shutdown,
            )
            .await;

        context.stop();
        let produced = tokio::task::spawn_blocking(move || producer_thread.join())
            .await
            .map_err(|_| PipelineError::ProducerPanicked)?
            .map_err(|_| PipelineError::ProducerPanicked)?;

        let report = PipelineReport {
            ticks,
            produced,
            ticks_per_attempt: consumer.cadence().ticks_per_attempt(),
        };
        info!(?report, "Pipeline stopped");
        Ok(report)
    }
}
