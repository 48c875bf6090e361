//! Cadence Calibration

/// Tick counting and starvation feedback for the consumer.
///
/// `ticks_per_attempt` only ever grows: it starts at the configured value and
/// gains one tick per starvation event, converging on the smallest cadence
/// the producer can sustain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenceController {
    /// Enabled ticks between dequeue attempts (>= 1)
    ticks_per_attempt: u32,
    /// Enabled ticks since the last attempt
    tick_counter: u32,
}

impl CadenceController {
    /// Create a controller starting at `initial_ticks_per_attempt` (clamped to 1)
    pub fn new(initial_ticks_per_attempt: u32) -> Self {
        Self {
            ticks_per_attempt: initial_ticks_per_attempt.max(1),
            tick_counter: 0,
        }
    }

    /// Current calibrated cadence
    pub fn ticks_per_attempt(&self) -> u32 {
        self.ticks_per_attempt
    }

    /// Enabled ticks counted since the last attempt
    pub fn tick_counter(&self) -> u32 {
        self.tick_counter
    }

    /// Calibrated cadence plus the manual slowdown
    pub fn effective_cadence(&self, manual_slowdown: u32) -> u32 {
        self.ticks_per_attempt.saturating_add(manual_slowdown)
    }

    /// Count one enabled tick. Returns true, and resets the counter, when an
    /// attempt is due.
    ///
    /// The counter is compared with `<` rather than `==`: if the slowdown
    /// drops while the counter sits above the new threshold, the very next
    /// tick still triggers an attempt.
    pub fn tick(&mut self, manual_slowdown: u32) -> bool {
        self.tick_counter = self.tick_counter.saturating_add(1);
        if self.tick_counter < self.effective_cadence(manual_slowdown) {
            return false;
        }
        self.tick_counter = 0;
        true
    }

    /// Widen the cadence by one tick after an empty attempt; returns the new value
    pub fn record_starvation(&mut self) -> u32 {
        self.ticks_per_attempt = self.ticks_per_attempt.saturating_add(1);
        self.ticks_per_attempt
    }
}

impl Default for CadenceController {
    fn default() -> Self {
        Self::new(1)
    }
}
