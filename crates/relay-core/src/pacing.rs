use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Spacing policy between successive outbound sends.
///
/// Broadcast loops call [`Pacer::pace`] before each destination; the pacer decides
/// how long to wait, so the iteration itself carries no timing logic.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pace(&self);
}

#[derive(Debug)]
struct IntervalLimiter {
    interval: Duration,
    next: Instant,
}

impl IntervalLimiter {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now(),
        }
    }

    /// Reserve the next slot and return the wait duration required before executing.
    fn reserve(&mut self) -> Duration {
        let now = Instant::now();
        let start = if now >= self.next { now } else { self.next };
        self.next = start + self.interval;
        start.saturating_duration_since(now)
    }
}

/// Fixed minimum interval between sends, shared by every caller of the same pacer.
///
/// Slots are reserved under a lock and slept outside it, so concurrent broadcasts
/// interleave but never exceed one send per interval in aggregate.
#[derive(Debug)]
pub struct FixedIntervalPacer {
    limiter: Mutex<IntervalLimiter>,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            limiter: Mutex::new(IntervalLimiter::new(interval)),
        }
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn pace(&self) {
        let wait = { self.limiter.lock().await.reserve() };
        if wait > Duration::from_millis(0) {
            sleep(wait).await;
        }
    }
}
