//! Injectable time and randomness sources.
//!
//! Scrapers never read the wall clock or the thread RNG directly; they go through
//! [`Clock`] and [`Jitter`] so tests can expire cache entries and zero out backoff
//! delays deterministically.

use rand::Rng;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of monotonic time
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// The real monotonic clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.start + offset
    }
}

/// Source of random delay offsets
pub trait Jitter: Send + Sync + std::fmt::Debug {
    /// A duration in `[0, max)`; zero when `max` is zero
    fn sample(&self, max: Duration) -> Duration;
}

/// Uniform jitter from the thread RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self, max: Duration) -> Duration {
        if max.is_zero() {
            return Duration::ZERO;
        }
        let secs = rand::thread_rng().gen_range(0.0..max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Always zero
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&self, _max: Duration) -> Duration {
        Duration::ZERO
    }
}

/// Pick a delay in `[min, max)` using the given jitter source
pub fn delay_between(jitter: &dyn Jitter, min: Duration, max: Duration) -> Duration {
    min + jitter.sample(max.saturating_sub(min))
}
