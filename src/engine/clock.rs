//! Fixed-interval tick source.
//!
//! The engine only reacts to ticks it is given; this clock is the default
//! external driver. Tests bypass it and call `tick()` directly with
//! synthetic sequences.

use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Delivers ticks at a fixed interval to a handler.
pub struct TickClock {
    period: Duration,
}

impl TickClock {
    /// Create a clock with the given period.
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Create a clock ticking every `seconds` seconds.
    pub fn from_seconds(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }

    /// Run until the handler returns `false`.
    ///
    /// Missed ticks are skipped, not replayed: a late tick reduces elapsed
    /// granularity but time is never counted out of order or backward.
    pub async fn run<F>(&self, mut on_tick: F)
    where
        F: FnMut() -> bool,
    {
        let start = tokio::time::Instant::now() + self.period;
        let mut interval = tokio::time::interval_at(start, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if !on_tick() {
                break;
            }
        }
    }
}
