//! Consumer Enable Gate

use std::sync::atomic::{AtomicBool, Ordering};

/// Gate deciding whether the consumer attempts dequeues.
///
/// Only the producer raises it (on observing a full buffer) and only the
/// consumer lowers it (on starvation), so each direction has a single
/// writer and plain loads and stores suffice.
#[derive(Debug, Default)]
pub struct EnableFlag(AtomicBool);

impl EnableFlag {
    /// Create a lowered gate; consumption starts disabled until the buffer fills
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Whether the consumer may attempt dequeues
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Raise the gate (producer side). Returns true if it was lowered before.
    pub fn enable(&self) -> bool {
        if self.0.load(Ordering::Acquire) {
            return false;
        }
        self.0.store(true, Ordering::Release);
        true
    }

    /// Lower the gate (consumer side). Returns true if it was raised before.
    pub fn disable(&self) -> bool {
        if !self.0.load(Ordering::Acquire) {
            return false;
        }
        self.0.store(false, Ordering::Release);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disabled() {
        assert!(!EnableFlag::new().is_enabled());
    }

    #[test]
    fn test_enable_is_edge_triggered() {
        let gate = EnableFlag::new();
        assert!(gate.enable());
        assert!(!gate.enable());
        assert!(gate.is_enabled());

        assert!(gate.disable());
        assert!(!gate.disable());
        assert!(!gate.is_enabled());
    }
}
