//! Token bucket guarding outbound JokeAPI calls.
//!
//! # Design Decisions
//! - Fixed window: the bucket is reset to full once per interval rather than
//!   trickle-refilled, matching the provider's per-minute quota
//! - One instance per process, constructed by `main` and shared via `Arc`
//! - Check-and-decrement and reset share one mutex

use std::sync::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant};

/// Default refill window.
pub const REFILL_INTERVAL: Duration = Duration::from_secs(60);

/// A fixed-capacity token bucket, refilled wholesale on an interval.
#[derive(Debug)]
pub struct JokeRateLimiter {
    tokens: Mutex<u32>,
    capacity: u32,
    refill_interval: Duration,
}

impl JokeRateLimiter {
    /// Create a full bucket that refills every [`REFILL_INTERVAL`].
    pub fn new(capacity: u32) -> Self {
        Self::with_interval(capacity, REFILL_INTERVAL)
    }

    /// Create a full bucket with a custom refill interval.
    pub fn with_interval(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            tokens: Mutex::new(capacity),
            capacity,
            refill_interval,
        }
    }

    /// Take one permit if any are left.
    pub fn try_acquire(&self) -> bool {
        let mut tokens = self.tokens.lock().expect("rate limiter mutex poisoned");
        if *tokens > 0 {
            *tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Reset the bucket to full capacity.
    pub fn refill(&self) {
        let mut tokens = self.tokens.lock().expect("rate limiter mutex poisoned");
        *tokens = self.capacity;
    }

    /// Permits currently left in the bucket.
    pub fn available(&self) -> u32 {
        *self.tokens.lock().expect("rate limiter mutex poisoned")
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn refill_interval(&self) -> Duration {
        self.refill_interval
    }

    /// Refill the bucket once per interval until shutdown is signalled.
    ///
    /// The first refill happens one full interval after the loop starts.
    pub async fn run_refill(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            capacity = self.capacity,
            interval_secs = self.refill_interval.as_secs_f64(),
            "Joke rate limiter refill loop starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.refill_interval, self.refill_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let before = self.available();
                    self.refill();
                    tracing::debug!(before, after = self.capacity, "Joke rate limiter refilled");
                }
                _ = shutdown.recv() => {
                    tracing::info!("Joke rate limiter received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
