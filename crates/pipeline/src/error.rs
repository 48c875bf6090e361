//! Pipeline Error Types

use thiserror::Error;

/// Errors while configuring or running the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration loaded but is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unrecognised slowdown control input
    #[error("Invalid slowdown command: {0:?}")]
    InvalidCommand(String),

    /// Logging could not be initialised
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Thread spawn or join failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The producer thread panicked
    #[error("Producer thread panicked")]
    ProducerPanicked,
}
