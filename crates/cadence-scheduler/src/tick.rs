//! Periodic Tick Source

use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Invokes a callback once per elapsed period.
///
/// The callback runs inline on the driving task, so it is never re-entered;
/// a tick that comes due while the callback is still running is delayed
/// rather than run alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSource {
    period: Duration,
}

impl TickSource {
    /// Create a tick source
    ///
    /// # Panics
    /// Panics if `period` is zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "tick period must be non-zero");
        Self { period }
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Call `on_tick` once per period until `shutdown` resolves.
    /// Returns the number of ticks delivered.
    pub async fn drive<F, S>(&self, mut on_tick: F, shutdown: S) -> u64
    where
        F: FnMut(),
        S: Future<Output = ()>,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        info!(period_us = self.period.as_micros() as u64, "Tick source started");

        tokio::pin!(shutdown);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    on_tick();
                    ticks += 1;
                }
            }
        }

        info!(ticks, "Tick source stopped");
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_one_callback_per_period() {
        let source = TickSource::new(Duration::from_millis(4));
        let mut calls = 0;

        let ticks = source
            .drive(|| calls += 1, sleep(Duration::from_millis(42)))
            .await;

        assert_eq!(ticks, 10);
        assert_eq!(calls, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_shutdown() {
        let source = TickSource::new(Duration::from_millis(1));
        let ticks = source.drive(|| {}, async {}).await;
        assert_eq!(ticks, 0);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_period_rejected() {
        TickSource::new(Duration::ZERO);
    }
}
