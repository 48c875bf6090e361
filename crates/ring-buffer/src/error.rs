//! Ring Buffer Error Types

use thiserror::Error;

/// Errors returned by the fallible ring buffer operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError<T> {
    /// Buffer is full; the rejected item is handed back
    #[error("ring buffer is full")]
    Full(T),

    /// Buffer is empty
    #[error("ring buffer is empty")]
    Empty,
}

impl<T> RingError<T> {
    /// Recover the rejected item, if any
    pub fn into_inner(self) -> Option<T> {
        match self {
            RingError::Full(item) => Some(item),
            RingError::Empty => None,
        }
    }
}
