//! Auto-loop timer.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Start/stop handle around a periodic tick.
///
/// The first tick fires one full period after [`LoopTimer::start`]. A stopped
/// timer never ticks, so it can sit in a `select!` branch unconditionally.
#[derive(Debug)]
pub struct LoopTimer {
    period: Duration,
    interval: Option<Interval>,
}

impl LoopTimer {
    /// Create a stopped timer. A zero period is raised to one millisecond.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            interval: None,
        }
    }

    /// Tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start the timer, or restart it if already running.
    pub fn start(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        tracing::debug!(period_secs = self.period.as_secs(), "Loop timer started");
    }

    /// Stop the timer. Pending waits never resolve.
    pub fn stop(&mut self) {
        if self.interval.take().is_some() {
            tracing::debug!("Loop timer stopped");
        }
    }

    /// Whether the timer is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick. Never resolves while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
