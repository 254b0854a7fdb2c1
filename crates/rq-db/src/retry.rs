//! Retry policy and the sleep seam between attempts

use std::time::Duration;

/// Default number of attempts when retry is enabled
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts (20 s)
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(20_000);

/// How many times a failing statement is attempted and how long to wait
/// between attempts.
pub trait RetryPolicy: Send + Sync {
    /// Total attempts allowed when retry is enabled, first attempt included
    fn max_attempts(&self) -> u32;

    /// Pause after failed attempt number `attempt` (1-based)
    fn delay_after(&self, attempt: u32) -> Duration;
}

/// Fixed attempt count with a constant delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    max_attempts: u32,
    delay: Duration,
}

impl FixedDelay {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy for FixedDelay {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay_after(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Blocks the calling thread between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
