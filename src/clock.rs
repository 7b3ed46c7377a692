use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::traits::Clock;

/// Wall clock backed by `Instant::now` and `thread::sleep`
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock for tests. Sleeping advances time instantly.
pub struct FakeClock {
    start: Instant,
    elapsed: Cell<Duration>,
    sleeps: Cell<usize>,
}

impl FakeClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
            sleeps: Cell::new(0),
        }
    }

    /// Moves time forward without counting as a sleep
    pub fn advance(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get() + duration);
    }

    #[must_use]
    pub fn sleep_count(&self) -> usize {
        self.sleeps.get()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
        self.advance(duration);
    }
}
