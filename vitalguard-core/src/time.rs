//! Clocks for the sampling loops
//!
//! Detectors never read a clock. Each step is handed a [`Timestamp`]: the
//! runtime passes [`MonotonicTime`], tests pass a [`FixedTime`] they move by
//! hand. Alert stamps in the snapshot come from the same monotonic clock.

/// Milliseconds since the monitor started
pub type Timestamp = u64;

/// Where loops get "now" from
pub trait TimeSource {
    fn now(&self) -> Timestamp;
}

/// Zero at construction, never goes backwards
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Manually advanced clock for tests
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Elapsed milliseconds between two timestamps, zero if the clock stepped back
pub fn delta_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);
    }

    #[test]
    fn monotonic_starts_near_zero_and_never_decreases() {
        let time = MonotonicTime::new();
        let first = time.now();
        assert!(first < 1000);
        assert!(time.now() >= first);
    }

    #[test]
    fn delta_saturates() {
        assert_eq!(delta_ms(1000, 1400), 400);
        assert_eq!(delta_ms(2000, 1000), 0);
    }
}
