//! RGB Producer/Consumer Pipeline
//!
//! Wires the RGB workload producer and the adaptive tick consumer around a
//! single ring buffer, with configuration, logging and a manual slowdown
//! control.

mod context;
mod control;
mod error;
mod settings;

pub use context::{Pipeline, PipelineContext, PipelineReport, BANNER, QUEUE_SLOTS};
pub use control::{apply_commands, spawn_stdin_control, SlowdownCommand};
pub use error::PipelineError;
pub use settings::{PipelineConfig, ENV_PREFIX};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging.
///
/// Logs go to stderr; stdout carries the diagnostic lines.
pub fn init_logging(level: Level) -> Result<(), PipelineError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| PipelineError::Logging(err.to_string()))
}
