//! Manual Slowdown Control

use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

/// Extra ticks added to the calibrated cadence by an external controller.
///
/// Read by the consumer at every threshold check; a change takes effect on
/// the next check without resetting the tick counter.
#[derive(Debug, Default)]
pub struct ManualSlowdown(AtomicU32);

impl ManualSlowdown {
    /// Create with an initial slowdown
    pub fn new(initial: u32) -> Self {
        Self(AtomicU32::new(initial))
    }

    /// Current slowdown in ticks
    #[inline]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// Replace the slowdown
    pub fn set(&self, ticks: u32) {
        self.0.store(ticks, Ordering::Release);
        info!(ticks, "Manual slowdown set");
    }

    /// Raise by `ticks`; returns the new value
    pub fn increase(&self, ticks: u32) -> u32 {
        let value = self.get().saturating_add(ticks);
        self.set(value);
        value
    }

    /// Lower by `ticks`, stopping at zero; returns the new value
    pub fn decrease(&self, ticks: u32) -> u32 {
        let value = self.get().saturating_sub(ticks);
        self.set(value);
        value
    }
}
