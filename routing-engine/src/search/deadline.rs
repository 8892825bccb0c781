//! Wall-clock budget enforcement.

use std::time::{Duration, Instant};

const CHECK_INTERVAL: u64 = 4096;

/// A deadline that polls the clock only every `CHECK_INTERVAL` ticks to keep
/// the per-node overhead of the search negligible.
pub(crate) struct Deadline {
    start: Instant,
    limit: Duration,
    ticks_since_check: u64,
    expired: bool,
}

impl Deadline {
    pub(crate) fn new(limit: Duration) -> Self {
        Self { start: Instant::now(), limit, ticks_since_check: 0, expired: false }
    }

    /// Counts one unit of work and reports whether the budget is exhausted.
    pub(crate) fn tick(&mut self) -> bool {
        if self.expired {
            return true;
        }
        self.ticks_since_check += 1;
        if self.ticks_since_check >= CHECK_INTERVAL {
            self.ticks_since_check = 0;
            self.expired = self.start.elapsed() > self.limit;
        }
        self.expired
    }
}
