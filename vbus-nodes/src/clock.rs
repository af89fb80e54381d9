//!
//! The Millisecond Tick Source for Nodes.
//!
//! Estimator and bus timing both run on a free-running u32 millisecond
//! counter (see vbus-utils::ticks).  On a hosted target that counter is
//! derived from a quanta monotonic clock; the u32 truncation gives
//! exactly the wrapping behavior the tick arithmetic is written for.
//!

use quanta::{Clock, Instant};

/// A free-running u32 millisecond counter backed by a monotonic clock.
pub struct MonotonicMillis {
    clock: Clock,
    origin: Instant,
}

impl MonotonicMillis {
    /// Create a counter whose zero is now.
    pub fn new() -> Self {
        let clock = Clock::new();
        let origin = clock.now();
        Self { clock, origin }
    }

    /// Milliseconds since the counter was created, wrapping at u32::MAX.
    pub fn now_ms(&self) -> u32 {
        self.clock.now().duration_since(self.origin).as_millis() as u32
    }
}

impl Default for MonotonicMillis {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_counter_advances() {
        let ticker = MonotonicMillis::new();
        let first = ticker.now_ms();
        sleep(Duration::from_millis(20));
        let second = ticker.now_ms();
        assert!(second >= first + 15, "counter barely moved: {first} -> {second}");
    }
}
