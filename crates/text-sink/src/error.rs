//! Sink Error Types

use thiserror::Error;

/// Errors while transmitting diagnostic text
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying writer failed
    #[error("Sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A writer panicked while holding the output lock
    #[error("Sink lock poisoned by a panicking writer")]
    Poisoned,
}
